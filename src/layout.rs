//! Note-to-point mapping.
//!
//! A layout turns the tracks of a file into anchor points (one per note),
//! and each anchor is then expanded by the rotational projection into the
//! dots of the frame. All scales are derived from the notes being drawn,
//! so the same notes always produce the same frame for a given view.
//!
//! Three layouts exist:
//!
//! - **Sequential ray** ("snowflake"): the note index sets the distance
//!   from the center, the pitch class (or the index) picks one of the rays.
//! - **Mirrored symmetry** ("mandala"): start time (or index) sets the
//!   distance, pitch a vertical offset; every anchor is rotated `fold`
//!   times and mirrored.
//! - **Multi-track ray**: each track gets its own ray and color.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LayoutConfig;
use crate::error::Error;
use crate::model::{Color, DrawCommand, Frame, Note, Point, ProjectedPoint, Track, ViewSize};
use crate::projection::{ray_position, rotated_positions, AngleMode, Symmetry};
use crate::scale::{dot_radius, extent, max_value, LinearScale};

/// Rays of the pitch-class snowflake, one per semitone.
const PITCH_CLASS_RAYS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LayoutMode {
    SequentialRay {
        #[serde(default)]
        rays: RayAssignment,
    },
    MirroredSixFold {
        #[serde(default)]
        distance: MandalaDistance,
        #[serde(default)]
        symmetry: Symmetry,
    },
    MultiTrackRay,
}

impl Default for LayoutMode {
    fn default() -> Self {
        LayoutMode::MirroredSixFold {
            distance: MandalaDistance::default(),
            symmetry: Symmetry::six_fold(),
        }
    }
}

impl FromStr for LayoutMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" | "snowflake" | "sequential-ray" => Ok(LayoutMode::SequentialRay {
                rays: RayAssignment::PitchClass,
            }),
            "sequential-index" => Ok(LayoutMode::SequentialRay {
                rays: RayAssignment::NoteIndex,
            }),
            "mandala" | "six-fold" | "mirrored-six-fold" => Ok(LayoutMode::default()),
            "mandala-index" => Ok(LayoutMode::MirroredSixFold {
                distance: MandalaDistance::NoteIndex,
                symmetry: Symmetry::six_fold(),
            }),
            "tracks" | "multi-track-ray" => Ok(LayoutMode::MultiTrackRay),
            other => Err(Error::InvalidConfig(format!("unknown layout mode '{other}'"))),
        }
    }
}

/// Which ray a note lands on in the sequential layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RayAssignment {
    /// Ray `pitch mod 12` of twelve
    #[default]
    PitchClass,
    /// Ray `i` of `n`, every note on its own ray
    NoteIndex,
}

/// What sets an anchor's distance from the center in the mandala layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MandalaDistance {
    #[default]
    StartTime,
    NoteIndex,
}

/// How an anchor is expanded into dots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// A single dot on ray `index` of `count`
    Ray { index: usize, count: usize },
    /// All rotated (and mirrored) copies
    Symmetric(Symmetry),
}

/// The un-rotated position derived from one note.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub note: Note,
    /// Index of the track the note came from
    pub track: usize,
    pub point: Point,
    pub radius: f64,
    pub color: Color,
    pub placement: Placement,
}

impl Anchor {
    /// Dots this anchor contributes to the frame.
    pub fn expand(&self, center: Point, mode: AngleMode) -> Vec<ProjectedPoint> {
        match self.placement {
            Placement::Ray { index, count } => {
                vec![ProjectedPoint::at(
                    ray_position(self.point, center, index, count, mode),
                    self.radius,
                )]
            }
            Placement::Symmetric(symmetry) => rotated_positions(self.point, center, symmetry, mode)
                .into_iter()
                .map(|p| ProjectedPoint::at(p, self.radius))
                .collect(),
        }
    }
}

/// Anchors of one frame together with the number of rejected notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorSet {
    pub anchors: Vec<Anchor>,
    pub skipped_notes: usize,
}

/// Lay out `tracks` for `view` and expand every anchor into draw commands.
///
/// Empty input yields an empty frame. Notes with non-finite times or an
/// out-of-range pitch are left out and counted in `skipped_notes`.
pub fn project(tracks: &[Track], view: ViewSize, config: &LayoutConfig) -> Frame {
    let AnchorSet {
        anchors,
        skipped_notes,
    } = anchors(tracks, view, config);
    let center = view.center();

    let mut commands = Vec::with_capacity(anchors.len());
    for anchor in &anchors {
        commands.extend(
            anchor
                .expand(center, config.angle_mode)
                .into_iter()
                .map(|point| DrawCommand {
                    point,
                    color: anchor.color.clone(),
                }),
        );
    }

    debug!(
        anchors = anchors.len(),
        points = commands.len(),
        width = view.width,
        height = view.height,
        "projected frame"
    );

    Frame {
        view,
        commands,
        skipped_notes,
    }
}

/// Compute the un-rotated anchor of every drawable note.
pub fn anchors(tracks: &[Track], view: ViewSize, config: &LayoutConfig) -> AnchorSet {
    let mut skipped = 0;
    let anchors = match config.mode {
        LayoutMode::SequentialRay { rays } => {
            let notes = valid_notes(selected_track(tracks, config.track), &mut skipped);
            sequential_ray(&notes, view, rays, config)
        }
        LayoutMode::MirroredSixFold { distance, symmetry } => {
            let notes = valid_notes(selected_track(tracks, config.track), &mut skipped);
            match distance {
                MandalaDistance::StartTime => mandala_by_time(&notes, view, symmetry, config),
                MandalaDistance::NoteIndex => mandala_by_index(&notes, view, symmetry, config),
            }
        }
        LayoutMode::MultiTrackRay => {
            let valid: Vec<Vec<Note>> = tracks
                .iter()
                .map(|t| valid_notes(t, &mut skipped))
                .collect();
            multi_track_ray(&valid, view, config)
        }
    };

    if skipped > 0 {
        warn!(skipped, "skipped malformed notes");
    }

    AnchorSet {
        anchors,
        skipped_notes: skipped,
    }
}

fn selected_track(tracks: &[Track], index: usize) -> &[Note] {
    tracks.get(index).map(Vec::as_slice).unwrap_or(&[])
}

fn valid_notes(notes: &[Note], skipped: &mut usize) -> Vec<Note> {
    notes
        .iter()
        .filter(|note| {
            let ok = note.is_valid();
            if !ok {
                debug!(?note, "dropping malformed note");
                *skipped += 1;
            }
            ok
        })
        .copied()
        .collect()
}

fn pitch_extent<'a, I>(notes: I) -> (f64, f64)
where
    I: IntoIterator<Item = &'a Note>,
{
    extent(notes.into_iter().map(|n| n.pitch as f64)).unwrap_or((0.0, 0.0))
}

fn sequential_ray(
    notes: &[Note],
    view: ViewSize,
    rays: RayAssignment,
    config: &LayoutConfig,
) -> Vec<Anchor> {
    let p = &config.ray;
    let center = view.center();
    let n = notes.len();
    let distance = LinearScale::new(
        (0.0, n as f64),
        (p.inner_radius, p.whole_fraction * view.max_dimension()),
    );

    notes
        .iter()
        .enumerate()
        .map(|(i, note)| {
            let point = Point::new(
                center.x + distance.apply(i as f64),
                center.y - note.octave_offset() as f64 * p.octave_step,
            );
            let (index, count) = match rays {
                RayAssignment::PitchClass => (note.pitch_class() as usize, PITCH_CLASS_RAYS),
                RayAssignment::NoteIndex => (i, n),
            };
            Anchor {
                note: *note,
                track: config.track,
                point,
                radius: p.dot_radius,
                color: config.foreground.clone(),
                placement: Placement::Ray { index, count },
            }
        })
        .collect()
}

fn mandala_by_time(
    notes: &[Note],
    view: ViewSize,
    symmetry: Symmetry,
    config: &LayoutConfig,
) -> Vec<Anchor> {
    let m = &config.mandala;
    let center = view.center();
    let whole = m.whole_fraction * view.max_dimension();
    let max_time = max_value(notes.iter().map(|n| n.end));
    let radius = dot_radius(whole, max_time, config.max_radius);

    let distance = LinearScale::new((0.0, max_time), (m.time_inner_dots * radius, whole));
    let (pmin, pmax) = pitch_extent(notes);
    let offset = LinearScale::new((pmin, pmax), (radius, radius * (pmax - pmin)));

    notes
        .iter()
        .map(|note| Anchor {
            note: *note,
            track: config.track,
            point: Point::new(
                center.x + distance.apply(note.start),
                center.y + offset.apply(note.pitch as f64),
            ),
            radius,
            color: config.foreground.clone(),
            placement: Placement::Symmetric(symmetry),
        })
        .collect()
}

fn mandala_by_index(
    notes: &[Note],
    view: ViewSize,
    symmetry: Symmetry,
    config: &LayoutConfig,
) -> Vec<Anchor> {
    let m = &config.mandala;
    let center = view.center();
    let whole = m.whole_fraction * view.max_dimension();
    let n = notes.len() as f64;
    let radius = dot_radius(whole, n, config.max_radius);

    let distance = LinearScale::new((0.0, n), (m.index_inner_dots * radius, whole));
    let offset = LinearScale::new(pitch_extent(notes), m.index_pitch_range);

    notes
        .iter()
        .enumerate()
        .map(|(i, note)| Anchor {
            note: *note,
            track: config.track,
            point: Point::new(
                center.x + distance.apply(i as f64),
                center.y + offset.apply(note.pitch as f64),
            ),
            radius,
            color: config.foreground.clone(),
            placement: Placement::Symmetric(symmetry),
        })
        .collect()
}

fn multi_track_ray(tracks: &[Vec<Note>], view: ViewSize, config: &LayoutConfig) -> Vec<Anchor> {
    let t = &config.tracks;
    let center = view.center();
    let whole = t.whole_fraction * view.max_dimension();
    let max_time = max_value(tracks.iter().flatten().map(|n| n.end));
    let radius = dot_radius(whole, max_time, config.max_radius);

    let distance = LinearScale::new((0.0, max_time), (whole * t.inner_fraction, whole));
    let (pmin, pmax) = pitch_extent(tracks.iter().flatten());
    let spread = radius * (pmax - pmin) / 2.0;
    let offset = LinearScale::new((pmin, pmax), (-spread, spread));

    let count = tracks.len();
    let mut anchors = Vec::with_capacity(tracks.iter().map(Vec::len).sum());
    for (index, notes) in tracks.iter().enumerate() {
        let color = config.track_color(index);
        for note in notes {
            anchors.push(Anchor {
                note: *note,
                track: index,
                point: Point::new(
                    center.x + distance.apply(note.start),
                    center.y - offset.apply(note.pitch as f64),
                ),
                radius,
                color: color.clone(),
                placement: Placement::Ray { index, count },
            });
        }
    }
    anchors
}
