//! Line classification. No timecode or channel interpretation happens here.

/// One physical EDL line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    Blank,
    Title(&'a str),
    Fcm(&'a str),
    Comment(Comment<'a>),
    /// Whitespace-separated fields of an event record.
    Record(Vec<&'a str>),
    /// `NNN  AUD  A2` or the legacy `AUD  3`, which has no event number.
    Continuation {
        event_id: Option<&'a str>,
        labels: Vec<&'a str>,
    },
    Unrecognized(&'a str),
}

/// A `*`-prefixed line, tagged by what the reader knows how to attach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Comment<'a> {
    /// `* FROM CLIP NAME:` or `* SOURCE FILE:`.
    SourceFile(&'a str),
    /// `* TO CLIP NAME:`, the incoming clip of a two-line dissolve.
    TargetClip(&'a str),
    /// `* LOC:` or `* MARKER:`; the position is still unparsed text.
    Marker {
        position: Option<&'a str>,
        label: &'a str,
    },
    /// Anything else, kept verbatim.
    Other(&'a str),
}

const SOURCE_TAGS: [&str; 2] = ["FROM CLIP NAME:", "SOURCE FILE:"];
const TARGET_TAGS: [&str; 1] = ["TO CLIP NAME:"];
const MARKER_TAGS: [&str; 2] = ["LOC:", "MARKER:"];

pub(crate) fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim_end();
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if let Some(rest) = strip_tag(trimmed, "TITLE:") {
        return Line::Title(rest.trim());
    }
    if let Some(rest) = strip_tag(trimmed, "FCM:") {
        return Line::Fcm(rest.trim());
    }
    // Comment payloads keep their trailing whitespace; file names may end in spaces.
    if let Some(body) = raw.trim_start().strip_prefix('*') {
        return Line::Comment(classify_comment(line, body.trim_start()));
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let Some(&first) = tokens.first() else {
        return Line::Blank;
    };
    if first.eq_ignore_ascii_case("AUD") {
        return Line::Continuation {
            event_id: None,
            labels: tokens[1..].to_vec(),
        };
    }
    if !is_digits(first) {
        return Line::Unrecognized(line);
    }
    if tokens.get(1).is_some_and(|t| t.eq_ignore_ascii_case("AUD")) {
        return Line::Continuation {
            event_id: Some(first),
            labels: tokens[2..].to_vec(),
        };
    }
    Line::Record(tokens)
}

fn classify_comment<'a>(line: &'a str, body: &'a str) -> Comment<'a> {
    if let Some(name) = SOURCE_TAGS.iter().find_map(|t| strip_tag(body, t)) {
        return Comment::SourceFile(after_tag(name));
    }
    if let Some(name) = TARGET_TAGS.iter().find_map(|t| strip_tag(body, t)) {
        return Comment::TargetClip(after_tag(name));
    }
    if let Some(rest) = MARKER_TAGS.iter().find_map(|t| strip_tag(body, t)) {
        let rest = rest.trim_start();
        let (head, tail) = rest.split_once(' ').unwrap_or((rest, ""));
        return if looks_like_timecode(head) {
            Comment::Marker {
                position: Some(head),
                label: tail,
            }
        } else {
            Comment::Marker {
                position: None,
                label: rest,
            }
        };
    }
    Comment::Other(line)
}

/// Drop the single separator space after a tag; the rest is payload.
fn after_tag(rest: &str) -> &str {
    rest.strip_prefix(' ').unwrap_or(rest)
}

/// Case-insensitive prefix strip.
fn strip_tag<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let head = text.get(..tag.len())?;
    head.eq_ignore_ascii_case(tag).then(|| &text[tag.len()..])
}

pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn looks_like_timecode(s: &str) -> bool {
    s.len() == 11 && s.contains([':', ';'])
}

/// Split `"Title  25 fps"` into the title and the rate hint.
pub(crate) fn split_rate_hint(title: &str) -> (&str, Option<u32>) {
    let title = title.trim();
    let lower = title.to_ascii_lowercase();
    if !lower.ends_with("fps") {
        return (title, None);
    }
    let head = title[..title.len() - 3].trim_end();
    let (rest, number) = match head.rsplit_once(char::is_whitespace) {
        Some((rest, number)) => (rest.trim_end(), number),
        None => ("", head),
    };
    match number.parse::<u32>() {
        Ok(fps) if is_digits(number) => (rest, Some(fps)),
        _ => (title, None),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reader/lexer.rs"]
mod tests;
