/// Prompt templates for the generative backend
///
/// Both builders are plain string construction: the same input always produces
/// the same prompt, byte for byte.
use crate::models::{Mood, RecommendationRequest};

/// Format example embedded in the full prompt. The parser must accept it as-is.
pub const FULL_REPLY_EXAMPLE: &str = r#"{
  "mood": "Creative",
  "films": [
    {
      "film": {
        "title": "Shaun of the Dead",
        "description": "Shaun is a lazy shop clerk caught in the middle of a zombie apocalypse. With his best friend he tries to save his girlfriend and his mother by taking them to the safest place he knows: the local pub.",
        "cast": "Simon Pegg, Nick Frost, Kate Ashfield",
        "duration": "99 minutes",
        "year": "2004"
      }
    },
    {
      "film": {
        "title": "Tucker and Dale vs. Evil",
        "description": "Two friends, Tucker and Dale, are mistaken for murderous hillbillies when a group of college students starts dying accidentally around their mountain cabin.",
        "cast": "Tyler Labine, Alan Tudyk, Katrina Bowden",
        "duration": "89 minutes",
        "year": "2010"
      }
    },
    {
      "film": {
        "title": "What We Do in the Shadows",
        "description": "A mock documentary about four vampire flatmates trying to find their place in the modern nightlife of Wellington.",
        "cast": "Jemaine Clement, Taika Waititi, Jonathan Brugh",
        "duration": "86 minutes",
        "year": "2014"
      }
    },
    {
      "film": {
        "title": "Scary Movie",
        "description": "A parody of horror films in which a group of friends faces absurd situations inspired by the genre.",
        "cast": "Anna Faris, Jon Abrahams, Marlon Wayans",
        "duration": "88 minutes",
        "year": "2000"
      }
    }
  ]
}"#;

/// Format example embedded in the topic prompt
pub const TOPIC_REPLY_EXAMPLE: &str = "Title1: \"The Shawshank Redemption\"\n\
Title2: \"La La Land\"\n\
Title3: \"Shrek\"\n\
Title4: \"Avatar\"";

/// Builds the prompt for the topic path
pub fn build_topic_prompt(topic: &str) -> String {
    format!(
        r#"You are an assistant that suggests films based on what the customer asks for. Always answer with a list of exactly 4 titles related to the requested topic, and nothing else. Do not add any comments of your own. There must be no duplicate titles.
Here is the request: recommend four films that are based on, or have something to do with, {topic}.
Put each title on its own line, prefixed with its position label. Example answer:
{example}"#,
        topic = topic,
        example = TOPIC_REPLY_EXAMPLE,
    )
}

/// Builds the prompt for the full-recommendation path
pub fn build_full_prompt(request: &RecommendationRequest) -> String {
    let moods = Mood::ALL
        .iter()
        .map(Mood::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are an assistant that helps the user pick 4 films, series or cartoons based on their answers. For each one you must always give a title, a description, the cast, the duration and the release year, without adding comments of your own.
Here is the request: recommend 4 {content_type} with the genres {genre_primary} and {genre_secondary}, based on this answer about the user's mood: {feeling}. Keep in mind that the user likes {movie_preference}, so something similar may appeal to them.
Each item must also relate in some way (by release year or by the period it depicts) to {era}.
The user watches on {platform}.
Answer in JSON only: a single object with a "films" array whose entries each hold a "film" object with "title", "description", "cast", "duration" and "year".
Also provide a "mood" that fits the answers you were given. The possible moods are: {moods}.
Never suggest the same item twice.
Example answer:
{example}"#,
        content_type = request.content_type,
        genre_primary = request.genre_primary,
        genre_secondary = request.genre_secondary,
        feeling = request.feeling,
        movie_preference = request.movie_preference,
        era = request.era,
        platform = request.platform,
        moods = moods,
        example = FULL_REPLY_EXAMPLE,
    )
}
