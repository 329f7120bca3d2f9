use crate::config::Config;
use crate::domain::MovieId;
use crate::services::MovieError;
use crate::state::SharedState;

pub async fn cmd_remove_movie(config: &Config, id: i32, yes: bool) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let id = MovieId::new(id);

    let movie = match state.movie_service.get_movie(id).await {
        Ok(movie) => movie,
        Err(MovieError::NotFound(_)) => {
            println!("Movie with ID {id} not found.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if !yes {
        println!("Delete '{}' ({}, ID: {})?", movie.name, movie.date, movie.id);
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    match state.movie_service.delete_movie(id).await {
        Ok(()) => println!("✓ Removed: {}", movie.name),
        Err(MovieError::NotFound(_)) => println!("Movie was already removed."),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
