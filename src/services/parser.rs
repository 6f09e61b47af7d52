/// Parsers for the two reply shapes the generative backend produces
///
/// The topic path gets a line-based reply ("Title1: ..." through "Title4: ..."),
/// the full path gets JSON, optionally wrapped in a Markdown code fence. Each call
/// site commits to one parser; the reply content is never sniffed to pick one.
use serde_json::{Map, Value};

use crate::{
    error::ParseError,
    models::{Mood, ParsedFilm, ParsedRecommendation, RECOMMENDATION_COUNT},
};

/// Labels the model puts in front of each topic title
const TITLE_LABELS: [&str; 2] = ["title", "titolo"];

const QUOTES: [char; 6] = ['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

/// Parses a topic reply into exactly four titles, in reply order
pub fn parse_topic_reply(raw: &str) -> Result<[String; RECOMMENDATION_COUNT], ParseError> {
    let lines: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < RECOMMENDATION_COUNT {
        return Err(ParseError::WrongItemCount {
            expected: RECOMMENDATION_COUNT,
            found: lines.len(),
        });
    }

    let mut titles = Vec::with_capacity(RECOMMENDATION_COUNT);
    for (index, line) in lines.iter().take(RECOMMENDATION_COUNT).enumerate() {
        let title = strip_title_label(line)
            .trim()
            .trim_matches(|c| QUOTES.contains(&c))
            .trim();

        if title.is_empty() {
            return Err(ParseError::MissingField(format!("Title{}", index + 1)));
        }
        titles.push(title.to_string());
    }

    let found = titles.len();
    titles.try_into().map_err(|_| ParseError::WrongItemCount {
        expected: RECOMMENDATION_COUNT,
        found,
    })
}

/// Removes a leading "Title<N>:" label, matched case-insensitively
fn strip_title_label(line: &str) -> &str {
    for label in TITLE_LABELS {
        let has_label = line
            .get(..label.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(label));
        if !has_label {
            continue;
        }

        let rest = &line[label.len()..];
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            continue;
        }

        if let Some(title) = rest[digits_end..].strip_prefix(':') {
            return title;
        }
    }
    line
}

/// Removes a Markdown code fence around the reply, if present
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
        if text
            .get(..4)
            .is_some_and(|lang| lang.eq_ignore_ascii_case("json"))
        {
            text = &text[4..];
        }
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parses a full-recommendation reply into a mood and exactly four films
pub fn parse_full_reply(raw: &str) -> Result<ParsedRecommendation, ParseError> {
    let body = strip_code_fence(raw);

    let value: Value =
        serde_json::from_str(body).map_err(|e| ParseError::MalformedJson(e.to_string()))?;

    let root = value
        .as_object()
        .ok_or_else(|| ParseError::MalformedJson("expected a JSON object".to_string()))?;

    let mood = parse_mood(root)?;

    let films = match root.get("films") {
        None | Some(Value::Null) => return Err(ParseError::MissingField("films".to_string())),
        Some(Value::Array(films)) => films,
        Some(_) => {
            return Err(ParseError::MalformedJson(
                "\"films\" must be an array".to_string(),
            ))
        }
    };

    if films.len() != RECOMMENDATION_COUNT {
        return Err(ParseError::WrongItemCount {
            expected: RECOMMENDATION_COUNT,
            found: films.len(),
        });
    }

    let films = films
        .iter()
        .enumerate()
        .map(|(index, wrapper)| parse_film(index, wrapper))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedRecommendation { mood, films })
}

fn parse_mood(root: &Map<String, Value>) -> Result<Mood, ParseError> {
    match root.get("mood") {
        None | Some(Value::Null) => Err(ParseError::MissingField("mood".to_string())),
        Some(Value::String(mood)) => mood.parse::<Mood>().map_err(|value| ParseError::InvalidValue {
            field: "mood".to_string(),
            value,
        }),
        Some(other) => Err(ParseError::InvalidValue {
            field: "mood".to_string(),
            value: other.to_string(),
        }),
    }
}

fn parse_film(index: usize, wrapper: &Value) -> Result<ParsedFilm, ParseError> {
    let path = format!("films[{}].film", index);
    let film = wrapper
        .get("film")
        .and_then(Value::as_object)
        .ok_or_else(|| ParseError::MissingField(path.clone()))?;

    Ok(ParsedFilm {
        title: text_field(film, &path, &["title", "titolo"])?,
        description: text_field(film, &path, &["description", "descrizione"])?,
        cast: cast_field(film, &path)?,
        duration: text_field(film, &path, &["duration", "durata"])?,
        year: text_field(film, &path, &["year", "anno"])?,
    })
}

/// Looks a field up under its current name, then its legacy aliases
fn lookup<'a>(film: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| film.get(*name))
        .filter(|value| !value.is_null())
}

/// Reads a text field verbatim. Numbers are accepted and kept as written.
fn text_field(
    film: &Map<String, Value>,
    path: &str,
    names: &[&str],
) -> Result<String, ParseError> {
    let field_path = || format!("{}.{}", path, names[0]);

    let text = match lookup(film, names) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(other) => {
            return Err(ParseError::InvalidValue {
                field: field_path(),
                value: other.to_string(),
            })
        }
        None => return Err(ParseError::MissingField(field_path())),
    };

    if text.trim().is_empty() {
        return Err(ParseError::MissingField(field_path()));
    }
    Ok(text)
}

fn cast_field(film: &Map<String, Value>, path: &str) -> Result<Vec<String>, ParseError> {
    let field_path = || format!("{}.cast", path);

    let cast = match lookup(film, &["cast"]) {
        Some(Value::String(names)) => normalize_cast(names),
        Some(Value::Array(names)) => names
            .iter()
            .map(|name| {
                name.as_str()
                    .map(|n| n.trim().to_string())
                    .ok_or_else(|| ParseError::InvalidValue {
                        field: field_path(),
                        value: name.to_string(),
                    })
            })
            .filter(|name| !matches!(name, Ok(n) if n.is_empty()))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(ParseError::InvalidValue {
                field: field_path(),
                value: other.to_string(),
            })
        }
        None => return Err(ParseError::MissingField(field_path())),
    };

    if cast.is_empty() {
        return Err(ParseError::MissingField(field_path()));
    }
    Ok(cast)
}

/// Splits a comma-separated cast list into trimmed names
pub fn normalize_cast(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
