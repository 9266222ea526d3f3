use rayon::prelude::*;

use crate::{
    dialect::{
        config::ExportConfig,
        grammar::{AudioLayout, Dialect, DialectGrammar},
        openshot,
    },
    foundation::error::{EdlError, EdlResult, Location},
    timeline::{
        gaps::is_gap_reel,
        model::{Channel, Event, Timeline, Transition},
    },
};

/// Serializes a [`Timeline`] into one dialect's text. Implementations are pure.
pub trait EdlWriter: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn write(&self, timeline: &Timeline, config: &ExportConfig) -> EdlResult<String>;
}

/// One output record stream with its channel field already resolved.
#[derive(Clone, Debug)]
struct PlannedTrack {
    channel: Channel,
    label: String,
    events: Vec<PlannedEvent>,
}

#[derive(Clone, Debug)]
struct PlannedEvent {
    event: Event,
    /// Channel fields of continuation lines.
    continuations: Vec<String>,
}

/// Write `timeline` in the dialect described by `grammar`.
///
/// All validation happens before any text is produced.
#[tracing::instrument(skip_all, fields(dialect = grammar.name, events = timeline.event_count()))]
pub fn write_with(
    grammar: &DialectGrammar,
    timeline: &Timeline,
    config: &ExportConfig,
) -> EdlResult<String> {
    config.validate()?;
    timeline.validate()?;
    check_header(timeline)?;

    let audio = config.effective_audio(timeline);
    check_audio_limit(grammar, &audio)?;

    let mut tracks = plan_tracks(grammar, timeline, config, &audio)?;
    let extent = tracks
        .iter()
        .flat_map(|t| t.events.iter())
        .map(|p| p.event.rec_out.frames())
        .max()
        .unwrap_or(0);
    for track in &mut tracks {
        let before = track.events.len();
        let events = std::mem::take(&mut track.events)
            .into_iter()
            .map(|p| p.event)
            .collect();
        track.events = grammar
            .gaps
            .apply(track.channel, events, extent, timeline.rate)
            .into_iter()
            .map(|event| PlannedEvent {
                continuations: continuation_labels(grammar, &event),
                event,
            })
            .collect();
        tracing::debug!(
            channel = %track.channel,
            label = %track.label,
            records = track.events.len(),
            gaps = track.events.len().saturating_sub(before),
            "planned track"
        );
    }

    for track in &tracks {
        for planned in &track.events {
            check_event(grammar, planned)?;
        }
    }

    // Event numbers are global; each track starts where the previous one ended.
    let mut starts = Vec::with_capacity(tracks.len());
    let mut next = 1u64;
    for track in &tracks {
        starts.push(next as u32);
        next += track.events.len() as u64;
    }
    check_id_width(grammar, next - 1)?;

    let bodies: Vec<String> = tracks
        .par_iter()
        .zip(starts.par_iter())
        .map(|(track, &first_id)| render_track(grammar, track, first_id))
        .collect();

    let mut out = render_header(grammar, timeline, config);
    for body in bodies {
        out.push_str(&body);
    }
    Ok(out)
}

fn check_id_width(grammar: &DialectGrammar, last_id: u64) -> EdlResult<()> {
    let max = 10u64.pow(grammar.id_width as u32) - 1;
    if last_id > max {
        return Err(EdlError::validation(format!(
            "event number {last_id} does not fit {}'s {}-digit field (at most {max})",
            grammar.name, grammar.id_width
        )));
    }
    Ok(())
}

fn check_audio_limit(grammar: &DialectGrammar, audio: &[u32]) -> EdlResult<()> {
    let Some(max) = grammar.audio.max_channels() else {
        return Ok(());
    };
    if audio.len() > max as usize || audio.iter().any(|&i| i > max) {
        let requested = audio
            .iter()
            .map(|i| format!("A{i}"))
            .collect::<Vec<_>>()
            .join(",");
        return Err(EdlError::UnsupportedAudioChannel {
            dialect: grammar.name,
            max,
            requested,
            at: Location::Unknown,
        });
    }
    Ok(())
}

/// Select and label the record streams, video first. Gaps from the input are dropped;
/// the dialect's gap policy regenerates them.
fn plan_tracks(
    grammar: &DialectGrammar,
    timeline: &Timeline,
    config: &ExportConfig,
    audio: &[u32],
) -> EdlResult<Vec<PlannedTrack>> {
    let keep_linked = |event: &Event| -> Event {
        let mut event = event.clone();
        if grammar.links_audio() {
            event.linked_audio.retain(|i| audio.contains(i));
            event.linked_audio.sort_unstable();
            event.linked_audio.dedup();
        } else {
            event.linked_audio.clear();
        }
        event
    };
    let planned = |events: Vec<Event>| -> Vec<PlannedEvent> {
        events
            .into_iter()
            .map(|event| PlannedEvent {
                continuations: Vec::new(),
                event,
            })
            .collect()
    };

    let mut out = Vec::new();
    if let Some(video) = timeline.track(Channel::Video) {
        let events = video
            .events
            .iter()
            .filter(|e| !e.is_gap)
            .map(keep_linked)
            .collect();
        out.push(PlannedTrack {
            channel: Channel::Video,
            label: config.video_label.clone(),
            events: planned(events),
        });
    }

    match grammar.audio {
        AudioLayout::Discrete { .. } => {
            for track in &timeline.tracks {
                let Some(index) = track.channel.audio_index() else {
                    continue;
                };
                if !audio.contains(&index) {
                    tracing::debug!(channel = %track.channel, "audio channel not exported");
                    continue;
                }
                let events = track
                    .events
                    .iter()
                    .filter(|e| !e.is_gap)
                    .map(keep_linked)
                    .collect();
                out.push(PlannedTrack {
                    channel: track.channel,
                    label: grammar.audio.label(index),
                    events: planned(events),
                });
            }
        }
        AudioLayout::Unified => {
            let events = openshot::unify_audio(timeline, audio)?;
            if !events.is_empty() {
                out.push(PlannedTrack {
                    channel: openshot::UNIFIED_AUDIO,
                    label: grammar.audio.label(1),
                    events: planned(events),
                });
            }
        }
    }
    Ok(out)
}

fn continuation_labels(grammar: &DialectGrammar, event: &Event) -> Vec<String> {
    if !grammar.links_audio() {
        return Vec::new();
    }
    event
        .linked_audio
        .iter()
        .map(|&i| grammar.audio.label(i))
        .collect()
}

fn check_event(grammar: &DialectGrammar, planned: &PlannedEvent) -> EdlResult<()> {
    let event = &planned.event;
    grammar.reel.check(&event.reel, event.location())?;
    if !event.is_gap && is_gap_reel(&event.reel) {
        return Err(EdlError::ReelNameInvalid {
            reel: event.reel.clone(),
            rule: "black/silence reel names are reserved for gap events".into(),
            at: event.location(),
        });
    }

    if let Some(name) = &event.source_filename
        && !single_line(name)
    {
        return Err(EdlError::validation(format!(
            "event {:03} source file name spans several lines",
            event.event_id
        )));
    }
    if event.markers.iter().any(|m| !single_line(&m.label))
        || event.comments.iter().any(|c| !single_line(c))
    {
        return Err(EdlError::validation(format!(
            "event {:03} has a multi-line marker or comment",
            event.event_id
        )));
    }
    if let Some(bad) = event.comments.iter().find(|c| !is_comment(c)) {
        return Err(EdlError::validation(format!(
            "event {:03} comment '{bad}' does not start with '*'",
            event.event_id
        )));
    }
    Ok(())
}

fn check_header(timeline: &Timeline) -> EdlResult<()> {
    match timeline
        .comments
        .iter()
        .find(|c| !single_line(c) || !is_comment(c))
    {
        Some(bad) => Err(EdlError::validation(format!(
            "timeline comment '{bad}' must be one line starting with '*'"
        ))),
        None => Ok(()),
    }
}

fn single_line(s: &str) -> bool {
    !s.contains(['\n', '\r'])
}

fn is_comment(s: &str) -> bool {
    s.trim_start().starts_with('*')
}

fn render_header(grammar: &DialectGrammar, timeline: &Timeline, config: &ExportConfig) -> String {
    let mut out = format!("TITLE: {}", config.title(timeline));
    if config.frame_rate_hint {
        out.push_str(&format!("  {}", timeline.rate));
    }
    out.truncate(out.trim_end().len());
    out.push('\n');
    if grammar.fcm_header {
        out.push_str("FCM: NON-DROP FRAME\n");
    }
    for comment in &timeline.comments {
        out.push_str(comment);
        out.push('\n');
    }
    out.push('\n');
    out
}

fn render_track(grammar: &DialectGrammar, track: &PlannedTrack, first_id: u32) -> String {
    let mut out = String::new();
    for (offset, planned) in track.events.iter().enumerate() {
        let id = first_id + offset as u32;
        render_event(grammar, &track.label, planned, id, &mut out);
    }
    out
}

fn render_event(
    grammar: &DialectGrammar,
    label: &str,
    planned: &PlannedEvent,
    id: u32,
    out: &mut String,
) {
    let event = &planned.event;
    out.push_str(&record_line(grammar, id, label, event));
    out.push('\n');

    for cont in &planned.continuations {
        out.push_str(&format!(
            "{id:0iw$}  {aud:<rw$} {cont}\n",
            aud = "AUD",
            iw = grammar.id_width,
            rw = grammar.reel.width(),
        ));
    }
    if let Some(name) = &event.source_filename {
        out.push_str(grammar.clip_comment);
        out.push_str(name);
        out.push('\n');
    }
    for marker in &event.markers {
        out.push_str(grammar.marker_comment);
        out.push_str(&marker.position.to_string());
        if !marker.label.is_empty() {
            out.push(' ');
            out.push_str(&marker.label);
        }
        out.push('\n');
    }
    for comment in &event.comments {
        out.push_str(comment.trim_end());
        out.push('\n');
    }
    out.push('\n');
}

/// `id  reel chan  tr dur src_in src_out rec_in rec_out` with the dialect's column widths.
pub fn record_line(
    grammar: &DialectGrammar,
    id: u32,
    label: &str,
    event: &Event,
) -> String {
    let (tr, dur) = match event.transition {
        Transition::Cut => ("C", String::new()),
        Transition::Dissolve(frames) => ("D", frames.to_string()),
    };
    format!(
        "{id:0iw$}  {reel:<rw$} {label:<4}  {tr:<4} {dur:>3} {} {} {} {}",
        event.src_in,
        event.src_out,
        event.rec_in,
        event.rec_out,
        reel = event.reel,
        iw = grammar.id_width,
        rw = grammar.reel.width(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/dialect/render.rs"]
mod tests;
