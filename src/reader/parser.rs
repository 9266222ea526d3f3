use crate::{
    dialect::grammar::Dialect,
    foundation::{
        core::{FrameRate, Timecode},
        error::{EdlError, EdlResult, Location},
    },
    reader::{
        detect::detect_dialect,
        lexer::{Comment, Line, classify, is_digits, split_rate_hint},
    },
    timeline::{
        gaps::is_gap_reel,
        model::{Channel, Event, Marker, RecoveredMedia, Timeline, Transition},
    },
};

#[derive(Clone, Debug)]
pub struct ReadOptions {
    /// Rate every timecode in the text is interpreted at.
    pub rate: FrameRate,
    /// Skip detection and report this dialect.
    pub dialect: Option<Dialect>,
    /// Keep reading after a bad line and return every error in the report.
    pub collect_errors: bool,
    /// Additional channel field to read as video, for lists written with a custom label.
    pub video_label: Option<String>,
}

impl ReadOptions {
    pub fn new(rate: FrameRate) -> Self {
        Self {
            rate,
            dialect: None,
            collect_errors: false,
            video_label: None,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    pub fn collecting_errors(mut self) -> Self {
        self.collect_errors = true;
        self
    }
}

/// Everything an import hands back to the host.
#[derive(Debug)]
pub struct ImportReport {
    pub timeline: Timeline,
    pub dialect: Dialect,
    /// File names recovered from clip-name comments, for strip re-creation.
    pub recovered: Vec<RecoveredMedia>,
    /// Only ever non-empty with [`ReadOptions::collect_errors`].
    pub errors: Vec<EdlError>,
}

/// Parse EDL text into a [`Timeline`], stopping at the first error.
pub fn parse(text: &str, rate: FrameRate) -> EdlResult<Timeline> {
    read(text, &ReadOptions::new(rate)).map(|report| report.timeline)
}

#[tracing::instrument(skip_all, fields(rate = %options.rate, bytes = text.len()))]
pub fn read(text: &str, options: &ReadOptions) -> EdlResult<ImportReport> {
    let dialect = options.dialect.unwrap_or_else(|| detect_dialect(text));
    let mut reader = Reader::new(options);
    for (index, raw) in text.lines().enumerate() {
        if let Err(err) = reader.feed(index + 1, raw) {
            reader.fail(err)?;
        }
    }
    let (timeline, errors) = reader.finish()?;
    tracing::debug!(
        %dialect,
        events = timeline.event_count(),
        errors = errors.len(),
        "read edit list"
    );
    Ok(ImportReport {
        recovered: timeline.recovered_media(),
        timeline,
        dialect,
        errors,
    })
}

/// Frame rate announced in a `TITLE: ...  25 fps` header, if any.
pub fn detect_rate_hint(text: &str) -> Option<FrameRate> {
    text.lines().find_map(|raw| match classify(raw) {
        Line::Title(title) => split_rate_hint(title)
            .1
            .and_then(|fps| FrameRate::new(fps).ok()),
        _ => None,
    })
}

/// Reader states. Comments and continuations attach to the open record until a
/// blank line or the next record closes it.
enum State<'a> {
    ExpectRecord,
    AfterRecord(Open),
    /// A zero-length cut waiting for the dissolve record with the same number.
    LeadIn {
        event_id: u32,
        line: usize,
        frame: u64,
        /// Comment lines seen before the dissolve record, replayed onto it.
        deferred: Vec<(usize, &'a str)>,
    },
    /// After a rejected record in collect mode; its trailing lines are dropped.
    Skipping,
}

struct Open {
    event: Event,
    line: usize,
    /// Built from a two-line dissolve; `TO CLIP NAME` names its source.
    folded: bool,
}

struct Reader<'a> {
    options: &'a ReadOptions,
    timeline: Timeline,
    state: State<'a>,
    errors: Vec<EdlError>,
}

impl<'a> Reader<'a> {
    fn new(options: &'a ReadOptions) -> Self {
        Self {
            options,
            timeline: Timeline::new("", options.rate),
            state: State::ExpectRecord,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, err: EdlError) -> EdlResult<()> {
        if !self.options.collect_errors {
            return Err(err);
        }
        tracing::debug!(error = %err, "skipping bad line");
        self.errors.push(err);
        Ok(())
    }

    fn feed(&mut self, line: usize, raw: &'a str) -> EdlResult<()> {
        let at = Location::Line(line);
        match classify(raw) {
            Line::Blank => self.close(),
            Line::Title(text) => {
                self.title(text);
                Ok(())
            }
            Line::Fcm(mode) => check_fcm(mode, at),
            Line::Comment(comment) => self.comment(line, raw, comment),
            Line::Record(tokens) => self.record(line, &tokens),
            Line::Continuation { event_id, labels } => {
                self.continuation(at, raw.trim(), event_id, &labels)
            }
            Line::Unrecognized(text) => Err(EdlError::unrecognized(text, at)),
        }
    }

    fn finish(mut self) -> EdlResult<(Timeline, Vec<EdlError>)> {
        if let Err(err) = self.close() {
            self.fail(err)?;
        }
        let order: Vec<EdlError> = self
            .timeline
            .tracks
            .iter()
            .filter_map(|t| t.validate_order().err())
            .collect();
        for err in order {
            self.fail(err)?;
        }
        Ok((self.timeline, self.errors))
    }

    fn title(&mut self, text: &str) {
        let (title, hint) = split_rate_hint(text);
        if let Some(fps) = hint
            && fps != self.options.rate.fps()
        {
            tracing::warn!(
                hint = fps,
                rate = self.options.rate.fps(),
                "title announces a different frame rate than the one used to read"
            );
        }
        self.timeline.title = title.to_string();
    }

    /// Close the open record, if any.
    fn close(&mut self) -> EdlResult<()> {
        match std::mem::replace(&mut self.state, State::ExpectRecord) {
            State::AfterRecord(open) => self.commit(open),
            State::LeadIn { line, frame, .. } => Err(EdlError::InvalidRange {
                in_frame: frame,
                out_frame: frame,
                at: Location::Line(line),
            }),
            State::ExpectRecord | State::Skipping => Ok(()),
        }
    }

    fn commit(&mut self, open: Open) -> EdlResult<()> {
        open.event
            .validate(self.options.rate)
            .map_err(|e| e.at(Location::Line(open.line)))?;
        self.timeline.push(open.event);
        Ok(())
    }

    fn record(&mut self, line: usize, tokens: &[&str]) -> EdlResult<()> {
        let at = Location::Line(line);
        let parsed = parse_record(tokens, self.options, at);

        if let State::LeadIn { event_id, .. } = self.state {
            let folds = matches!(
                &parsed,
                Ok(e) if e.event_id == event_id && matches!(e.transition, Transition::Dissolve(_))
            );
            if folds && let Ok(event) = parsed {
                let State::LeadIn { deferred, .. } =
                    std::mem::replace(&mut self.state, State::ExpectRecord)
                else {
                    return Ok(());
                };
                self.state = State::AfterRecord(Open {
                    event,
                    line,
                    folded: true,
                });
                for (comment_line, raw) in deferred {
                    if let Line::Comment(comment) = classify(raw) {
                        self.comment(comment_line, raw, comment)?;
                    }
                }
                return Ok(());
            }
        }

        if let Err(err) = self.close() {
            self.fail(err)?;
        }
        let event = match parsed {
            Ok(event) => event,
            Err(err) => {
                self.state = State::Skipping;
                return Err(err);
            }
        };
        self.state = if event.rec_in == event.rec_out && event.transition == Transition::Cut {
            State::LeadIn {
                event_id: event.event_id,
                line,
                frame: event.rec_in.frames(),
                deferred: Vec::new(),
            }
        } else {
            State::AfterRecord(Open {
                event,
                line,
                folded: false,
            })
        };
        Ok(())
    }

    fn continuation(
        &mut self,
        at: Location,
        text: &str,
        event_id: Option<&str>,
        labels: &[&str],
    ) -> EdlResult<()> {
        let unrecognized = || EdlError::unrecognized(text, at);
        let open = match &mut self.state {
            State::AfterRecord(open) => open,
            State::Skipping => return Ok(()),
            State::ExpectRecord | State::LeadIn { .. } => return Err(unrecognized()),
        };
        if let Some(id) = event_id
            && id.parse::<u32>().ok() != Some(open.event.event_id)
        {
            return Err(unrecognized());
        }
        if labels.is_empty() {
            return Err(unrecognized());
        }
        for label in labels {
            let indices = if is_digits(label) {
                vec![label.parse::<u32>().map_err(|_| unrecognized())?]
            } else {
                match channel_label(label, None) {
                    Some((Channel::Audio(index), mut linked)) => {
                        linked.insert(0, index);
                        linked
                    }
                    _ => return Err(unrecognized()),
                }
            };
            for index in indices {
                if index == 0 {
                    return Err(unrecognized());
                }
                let event = &mut open.event;
                if event.channel.audio_index() != Some(index) && !event.linked_audio.contains(&index) {
                    event.linked_audio.push(index);
                }
            }
        }
        Ok(())
    }

    fn comment(&mut self, line: usize, raw: &'a str, comment: Comment<'_>) -> EdlResult<()> {
        let rate = self.options.rate;
        let open = match &mut self.state {
            State::AfterRecord(open) => open,
            State::LeadIn { deferred, .. } => {
                deferred.push((line, raw));
                return Ok(());
            }
            State::Skipping => return Ok(()),
            State::ExpectRecord => {
                self.timeline.comments.push(raw.trim_end().to_string());
                return Ok(());
            }
        };
        let event = &mut open.event;
        match comment {
            Comment::SourceFile(name)
                if !open.folded && !event.is_gap && event.source_filename.is_none() =>
            {
                event.source_filename = Some(name.to_string());
            }
            Comment::TargetClip(name)
                if open.folded && !event.is_gap && event.source_filename.is_none() =>
            {
                event.source_filename = Some(name.to_string());
            }
            Comment::Marker { position, label } => {
                let position = match position {
                    Some(text) => {
                        Timecode::parse(text, rate).map_err(|e| e.at(Location::Line(line)))?
                    }
                    None => event.rec_in,
                };
                event.markers.push(Marker {
                    position,
                    label: label.to_string(),
                });
            }
            _ => event.comments.push(raw.trim_end().to_string()),
        }
        Ok(())
    }
}

fn check_fcm(mode: &str, at: Location) -> EdlResult<()> {
    let mode = mode.to_ascii_uppercase();
    if mode.contains("NON-DROP") || mode.contains("NON DROP") {
        Ok(())
    } else if mode.contains("DROP") {
        Err(EdlError::unsupported("drop-frame timecode", at))
    } else {
        Err(EdlError::unsupported(format!("frame code mode '{mode}'"), at))
    }
}

fn parse_record(tokens: &[&str], options: &ReadOptions, at: Location) -> EdlResult<Event> {
    let unrecognized = || EdlError::unrecognized(tokens.join(" "), at);
    let (id, reel, label, tr, dur, times) = match tokens {
        [id, reel, label, tr, a, b, c, d] => (id, reel, label, tr, None, [a, b, c, d]),
        [id, reel, label, tr, dur, a, b, c, d] => (id, reel, label, tr, Some(*dur), [a, b, c, d]),
        _ => return Err(unrecognized()),
    };
    let event_id: u32 = id.parse().map_err(|_| unrecognized())?;

    let kind = tr.to_ascii_uppercase();
    let transition = match (kind.as_str(), dur) {
        ("C", None) => Transition::Cut,
        ("C", Some(d)) if is_digits(d) => Transition::Cut,
        ("D", Some(d)) if is_digits(d) => {
            Transition::Dissolve(d.parse().map_err(|_| unrecognized())?)
        }
        (k, _) if k.starts_with('W') || k.starts_with('K') => {
            return Err(EdlError::unsupported(format!("transition '{tr}'"), at));
        }
        _ => return Err(unrecognized()),
    };

    let video_label = options.video_label.as_deref();
    let Some((channel, linked_audio)) = channel_label(label, video_label) else {
        return Err(unrecognized());
    };

    let mut tcs = Vec::with_capacity(4);
    for text in times {
        tcs.push(Timecode::parse(text, options.rate).map_err(|e| e.at(at))?);
    }

    Ok(Event {
        event_id,
        reel: reel.to_string(),
        channel,
        linked_audio,
        transition,
        src_in: tcs[0],
        src_out: tcs[1],
        rec_in: tcs[2],
        rec_out: tcs[3],
        source_filename: None,
        markers: Vec::new(),
        comments: Vec::new(),
        is_gap: is_gap_reel(reel),
    })
}

/// Map a channel field to its primary channel and any audio it carries along.
pub(crate) fn channel_label(label: &str, video_label: Option<&str>) -> Option<(Channel, Vec<u32>)> {
    if video_label.is_some_and(|v| v.eq_ignore_ascii_case(label)) {
        return Some((Channel::Video, Vec::new()));
    }
    let upper = label.to_ascii_uppercase();
    match upper.as_str() {
        "V" => Some((Channel::Video, Vec::new())),
        "A" => Some((Channel::Audio(1), Vec::new())),
        "AA" => Some((Channel::Audio(1), vec![2])),
        "B" | "VA" | "A/V" => Some((Channel::Video, vec![1])),
        "AA/V" => Some((Channel::Video, vec![1, 2])),
        _ => {
            if let Some(n) = upper.strip_prefix('V')
                && is_digits(n)
            {
                return Some((Channel::Video, Vec::new()));
            }
            let n = upper.strip_prefix('A').filter(|n| is_digits(n))?;
            let index = n.parse::<u32>().ok().filter(|&i| i > 0)?;
            Some((Channel::Audio(index), Vec::new()))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reader/parser.rs"]
mod tests;
