mod common;

use std::time::{Duration, Instant};

use rand::Rng;

use common::{full_reply, topic_reply, TablePosterLookup, TestContext};
use moodreel_api::{
    db::HistoryRepository,
    error::{AppError, ParseError},
    models::{Mood, RecommendationRequest, POSTER_NOT_FOUND},
};

fn request() -> RecommendationRequest {
    RecommendationRequest {
        content_type: "cartoon".to_string(),
        genre_primary: "adventure".to_string(),
        genre_secondary: "fantasy".to_string(),
        feeling: "curious".to_string(),
        movie_preference: "Spirited Away".to_string(),
        era: "1980-2000".to_string(),
        platform: "any".to_string(),
    }
}

#[tokio::test]
async fn test_output_order_matches_reply_under_random_latency() {
    let titles = ["Akira", "Totoro", "Castle in the Sky", "Porco Rosso"];
    let mut rng = rand::rng();

    for _ in 0..5 {
        let mut posters = TablePosterLookup::new();
        for title in titles {
            let delay = Duration::from_millis(rng.random_range(0..40));
            posters = posters
                .with_delay(title, delay)
                .with_poster(title, &format!("https://img/{}.jpg", title));
        }

        let ctx = TestContext::new(posters);
        ctx.backend.push_reply(topic_reply(titles));

        let result = ctx.pipeline().run_topic_query("anime").await.unwrap();
        let got: Vec<&str> = result.titles.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(got, titles);

        for item in &result.titles {
            assert_eq!(item.poster_url, format!("https://img/{}.jpg", item.title));
        }
    }
}

#[tokio::test]
async fn test_poster_lookups_run_concurrently() {
    let titles = ["A", "B", "C", "D"];
    let mut posters = TablePosterLookup::new();
    for title in titles {
        posters = posters.with_delay(title, Duration::from_millis(200));
    }

    let ctx = TestContext::new(posters);
    ctx.history.register_user("ada").await;
    ctx.backend.push_reply(full_reply("Happy", titles));

    let started = Instant::now();
    let result = ctx
        .pipeline()
        .run_full_recommendation(&request(), "ada")
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(result.films.len(), 4);
    assert!(
        elapsed < Duration::from_millis(700),
        "lookups look sequential: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_full_path_with_legacy_reply() {
    let reply = r#"```
{
  "mood": "Malinconico",
  "films": [
    { "film": { "titolo": "Up", "descrizione": "A widower flies his house away.", "cast": ["Ed Asner", "Jordan Nagai"], "durata": 96, "anno": 2009 } },
    { "film": { "title": "Coco", "description": "A boy visits the Land of the Dead.", "cast": "Anthony Gonzalez, Gael Garcia Bernal", "duration": "105 minutes", "year": "2017" } },
    { "film": { "title": "Wall-E", "description": "A robot cleans up Earth.", "cast": "Ben Burtt", "duration": "98 minutes", "year": "2008" } },
    { "film": { "title": "Inside Out", "description": "Emotions run a girl's mind.", "cast": "Amy Poehler, Phyllis Smith", "duration": "95 minutes", "year": "2015" } }
  ]
}
```"#;

    let ctx = TestContext::new(TablePosterLookup::new().with_poster("Up", "https://img/up.jpg"));
    ctx.history.register_user("ada").await;
    ctx.backend.push_reply(reply);

    let result = ctx
        .pipeline()
        .run_full_recommendation(&request(), "ada")
        .await
        .unwrap();

    assert_eq!(result.mood, Mood::Melancholic);
    assert_eq!(result.films[0].film.title, "Up");
    assert_eq!(result.films[0].film.duration, "96");
    assert_eq!(result.films[0].film.cast, vec!["Ed Asner", "Jordan Nagai"]);
    assert_eq!(result.films[0].poster_url, "https://img/up.jpg");
    assert_eq!(result.films[1].poster_url, POSTER_NOT_FOUND);

    let history = ctx.history.load_history("ada").await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].year, 2009);
}

#[tokio::test]
async fn test_unreadable_year_is_not_persisted() {
    let reply = full_reply("Happy", ["A", "B", "C", "D"]).replace("\"2001\"", "\"the nineties\"");

    let ctx = TestContext::new(TablePosterLookup::new());
    ctx.history.register_user("ada").await;
    ctx.backend.push_reply(reply);

    let result = ctx
        .pipeline()
        .run_full_recommendation(&request(), "ada")
        .await
        .unwrap();
    assert_eq!(result.films.len(), 4);

    let history = ctx.history.load_history("ada").await.unwrap();
    let titles: Vec<&str> = history.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "C", "D"]);
}

#[tokio::test]
async fn test_wrong_film_count_fails_without_lookups() {
    let reply = r#"{"mood": "Happy", "films": [{"film": {"title": "Solo", "description": "d", "cast": "c", "duration": "1h", "year": "2018"}}]}"#;

    let ctx = TestContext::new(TablePosterLookup::new());
    ctx.history.register_user("ada").await;
    ctx.backend.push_reply(reply);

    let result = ctx
        .pipeline()
        .run_full_recommendation(&request(), "ada")
        .await;

    assert!(matches!(
        result,
        Err(AppError::Parse(ParseError::WrongItemCount { expected: 4, found: 1 }))
    ));
    assert!(ctx.posters.calls.lock().unwrap().is_empty());
    assert!(ctx.history.load_history("ada").await.unwrap().is_empty());
}
