//! Standard MIDI File loading.
//!
//! Parses SMF bytes with `midly` and pairs note-on/note-off events into
//! [`Note`]s with start and end times in seconds. Tempo changes from any
//! track apply to every track (format 0 and 1); in a format 2 file each
//! track keeps its own tempo map.

use std::collections::{HashMap, VecDeque};

use midly::{Format, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use tracing::{debug, info};

use crate::error::Result;
use crate::model::{Note, Track};

/// Microseconds per quarter note when a file sets no tempo (120 BPM).
pub const DEFAULT_TEMPO_US: u32 = 500_000;

/// Parse SMF bytes into tracks of notes sorted by start time.
///
/// Tracks without any notes (tempo maps, conductor tracks) are dropped.
pub fn parse_midi(data: &[u8]) -> Result<Vec<Track>> {
    let smf = Smf::parse(data)?;

    let shared = match smf.header.format {
        Format::Sequential => None,
        Format::SingleTrack | Format::Parallel => {
            Some(TickClock::new(smf.header.timing, &smf.tracks))
        }
    };

    let mut tracks = Vec::new();
    for (track_nr, events) in smf.tracks.iter().enumerate() {
        let own;
        let clock = match &shared {
            Some(clock) => clock,
            None => {
                own = TickClock::new(smf.header.timing, std::slice::from_ref(events));
                &own
            }
        };
        let notes = extract_notes(events, clock);
        if notes.is_empty() {
            debug!(track_nr, "skipping track without notes");
            continue;
        }
        debug!(track_nr, notes = notes.len(), "parsed track");
        tracks.push(notes);
    }

    info!(
        tracks = tracks.len(),
        notes = tracks.iter().map(Vec::len).sum::<usize>(),
        "loaded MIDI file"
    );
    Ok(tracks)
}

/// Converts absolute ticks to seconds.
#[derive(Debug, Clone)]
struct TickClock {
    timebase: Timebase,
    /// `(tick, microseconds per quarter)`, sorted by tick
    tempo_changes: Vec<(u64, u32)>,
}

#[derive(Debug, Clone, Copy)]
enum Timebase {
    /// Ticks per quarter note
    Metrical(u16),
    /// Fixed wall-clock tick length
    Timecode { seconds_per_tick: f64 },
}

impl TickClock {
    fn new(timing: Timing, tracks: &[Vec<TrackEvent<'_>>]) -> Self {
        let timebase = match timing {
            Timing::Metrical(tpq) => Timebase::Metrical(tpq.as_int().max(1)),
            Timing::Timecode(fps, subframes) => {
                let ticks_per_second = (fps.as_f32() as f64 * subframes as f64).max(1.0);
                Timebase::Timecode {
                    seconds_per_tick: 1.0 / ticks_per_second,
                }
            }
        };

        let mut tempo_changes = Vec::new();
        for events in tracks {
            let mut tick = 0u64;
            for event in events {
                tick += event.delta.as_int() as u64;
                if let TrackEventKind::Meta(MetaMessage::Tempo(us)) = event.kind {
                    tempo_changes.push((tick, us.as_int()));
                }
            }
        }
        tempo_changes.sort_by_key(|&(tick, _)| tick);

        Self {
            timebase,
            tempo_changes,
        }
    }

    fn seconds(&self, tick: u64) -> f64 {
        let tpq = match self.timebase {
            Timebase::Timecode { seconds_per_tick } => return tick as f64 * seconds_per_tick,
            Timebase::Metrical(tpq) => tpq as f64,
        };

        let mut seconds = 0.0;
        let mut last_tick = 0u64;
        let mut tempo = DEFAULT_TEMPO_US;
        for &(at, us) in &self.tempo_changes {
            if at > tick {
                break;
            }
            seconds += (at - last_tick) as f64 * tempo as f64 / 1e6 / tpq;
            last_tick = at;
            tempo = us;
        }
        seconds + (tick - last_tick) as f64 * tempo as f64 / 1e6 / tpq
    }
}

/// Pair note-ons with note-offs on the same channel and key, first in
/// first out. Notes still held at the end of the track end there.
fn extract_notes(events: &[TrackEvent<'_>], clock: &TickClock) -> Track {
    let mut active: HashMap<(u8, u8), VecDeque<u64>> = HashMap::new();
    let mut ticks: Vec<(u64, u64, u8)> = Vec::new();
    let mut tick = 0u64;

    for event in events {
        tick += event.delta.as_int() as u64;
        let TrackEventKind::Midi { channel, message } = event.kind else {
            continue;
        };
        let (on, key) = match message {
            MidiMessage::NoteOn { key, vel } => (vel.as_int() > 0, key.as_int()),
            MidiMessage::NoteOff { key, .. } => (false, key.as_int()),
            _ => continue,
        };
        let slot = (channel.as_int(), key);
        if on {
            active.entry(slot).or_default().push_back(tick);
        } else if let Some(start) = active.get_mut(&slot).and_then(VecDeque::pop_front) {
            ticks.push((start, tick, key));
        }
    }

    for ((_, key), starts) in active {
        for start in starts {
            ticks.push((start, tick, key));
        }
    }

    ticks.sort_unstable();
    ticks
        .into_iter()
        .map(|(start, end, pitch)| Note::new(clock.seconds(start), clock.seconds(end), pitch))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrical(changes: Vec<(u64, u32)>) -> TickClock {
        TickClock {
            timebase: Timebase::Metrical(480),
            tempo_changes: changes,
        }
    }

    #[test]
    fn default_tempo_is_120_bpm() {
        let clock = metrical(Vec::new());
        assert_eq!(clock.seconds(0), 0.0);
        assert!((clock.seconds(480) - 0.5).abs() < 1e-12);
        assert!((clock.seconds(960) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tempo_changes_apply_from_their_tick() {
        // 120 BPM for one beat, then 60 BPM
        let clock = metrical(vec![(0, 500_000), (480, 1_000_000)]);
        assert!((clock.seconds(480) - 0.5).abs() < 1e-12);
        assert!((clock.seconds(960) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn timecode_ticks_are_fixed_length() {
        let clock = TickClock {
            timebase: Timebase::Timecode {
                seconds_per_tick: 1.0 / 1000.0,
            },
            tempo_changes: vec![(0, 1_000_000)],
        };
        assert!((clock.seconds(2500) - 2.5).abs() < 1e-12);
    }
}
