mod init;
mod list;
mod migrate;
mod remove;
mod show;

pub use init::cmd_init;
pub use list::cmd_list_movies;
pub use migrate::cmd_migrate;
pub use remove::cmd_remove_movie;
pub use show::cmd_show_movie;
