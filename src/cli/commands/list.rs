//! List movies command handler

use crate::config::Config;
use crate::pagination::PageRequest;
use crate::services::MovieError;
use crate::state::SharedState;

pub async fn cmd_list_movies(
    config: &Config,
    page: u64,
    per_page: Option<u64>,
) -> anyhow::Result<()> {
    let per_page = per_page.unwrap_or(config.catalog.default_per_page);
    if page == 0 || per_page == 0 || per_page > config.catalog.max_per_page {
        println!(
            "Page must be >= 1 and per-page between 1 and {}",
            config.catalog.max_per_page
        );
        return Ok(());
    }

    let state = SharedState::new(config.clone()).await?;

    let result = state
        .movie_service
        .list_movies(PageRequest::new(page, per_page))
        .await;

    let page = match result {
        Ok(page) => page,
        Err(MovieError::NoMoviesFound) => {
            println!("No movies found.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!(
        "Movies (page {}/{}, {} total)",
        page.request.page, page.total_pages, page.total_items
    );
    println!("{:-<70}", "");

    for movie in &page.items {
        println!("{} ({}) score {}", movie.name, movie.date, movie.score);
        println!("  ID: {}", movie.id);
    }

    if let Some(next) = page.request.next_page(page.total_pages) {
        println!();
        println!("Next page: movie-catalog list --page {next} --per-page {per_page}");
    }

    Ok(())
}
