use crate::config::Config;
use crate::domain::MovieId;
use crate::services::MovieError;
use crate::state::SharedState;

fn join_names(names: &[crate::models::movie::NamedRef]) -> String {
    if names.is_empty() {
        return "-".to_string();
    }
    names
        .iter()
        .map(|n| n.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub async fn cmd_show_movie(config: &Config, id: i32) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let movie = match state.movie_service.get_movie(MovieId::new(id)).await {
        Ok(movie) => movie,
        Err(MovieError::NotFound(_)) => {
            println!("Movie with ID {id} not found.");
            println!("Use 'movie-catalog list' to see movie IDs.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{} ({})", movie.name, movie.date);
    println!("{:-<70}", "");
    println!("ID:        {}", movie.id);
    println!("Status:    {}", movie.status);
    println!("Score:     {}", movie.score);
    println!("Budget:    {}", movie.budget);
    println!("Revenue:   {}", movie.revenue);
    println!(
        "Country:   {}{}",
        movie.country.code,
        movie
            .country
            .name
            .as_deref()
            .map(|name| format!(" ({name})"))
            .unwrap_or_default()
    );
    println!("Genres:    {}", join_names(&movie.genres));
    println!("Actors:    {}", join_names(&movie.actors));
    println!("Languages: {}", join_names(&movie.languages));
    println!();
    println!("{}", movie.overview);

    Ok(())
}
