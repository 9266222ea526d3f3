use crate::{
    dialect::grammar::Dialect,
    reader::lexer::{Comment, Line, classify, is_digits},
    timeline::gaps::is_gap_reel,
};

/// Guess which dialect produced `text`.
///
/// Four-digit event numbers mean GVG. OpenShot's comment spellings mean OpenShot.
/// When every real reel is a number of at most three digits the list is CMX 340.
/// Anything else reads as CMX 3600.
pub fn detect_dialect(text: &str) -> Dialect {
    let mut records = 0usize;
    let mut numeric_reels = 0usize;
    let mut openshot_comments = false;
    for raw in text.lines() {
        match classify(raw) {
            Line::Record(tokens) => {
                if tokens[0].len() == 4 {
                    return Dialect::Gvg;
                }
                let Some(reel) = tokens.get(1) else {
                    continue;
                };
                if is_gap_reel(reel) {
                    continue;
                }
                records += 1;
                if is_digits(reel) && reel.len() <= 3 {
                    numeric_reels += 1;
                }
            }
            Line::Comment(Comment::Marker { .. } | Comment::SourceFile(_)) => {
                let body = raw.trim_start().trim_start_matches('*').trim_start();
                let upper = body.to_ascii_uppercase();
                if upper.starts_with("SOURCE FILE:") || upper.starts_with("MARKER:") {
                    openshot_comments = true;
                }
            }
            _ => {}
        }
    }
    if openshot_comments {
        Dialect::OpenShot
    } else if records > 0 && numeric_reels == records {
        Dialect::Cmx340
    } else {
        Dialect::Cmx3600
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reader/detect.rs"]
mod tests;
