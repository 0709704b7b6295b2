//! Templated natural-language answers for local search results.

use crate::models::SearchResult;

pub const NO_RESULTS_RESPONSE: &str = "I couldn't find specific information about that in my portfolio. Feel free to ask about my experiences, projects, education, or blog posts!";

pub const RELATED_SUFFIX: &str =
    " I also have related experience in other areas that might interest you.";

/// Builds a one-sentence answer from the top-ranked result.
pub fn compose_response(results: &[SearchResult]) -> String {
    let Some(top) = results.first() else {
        return NO_RESULTS_RESPONSE.to_string();
    };

    let mut response = match top.kind.as_str() {
        "experience" => format!("Based on my experience with {}, {}", top.title, top.summary),
        "project" => format!("I've worked on {}. {}", top.title, top.summary),
        "blog" => format!(
            "I wrote about this in my blog post \"{}\". {}",
            top.title, top.summary
        ),
        "education" => format!("Regarding my education, {}", top.summary),
        _ => String::new(),
    };

    if results.len() > 1 {
        response.push_str(RELATED_SUFFIX);
    }
    response
}
