// Front-end state that does not touch browser APIs, so host tests can
// include this file directly. Event handlers share it as
// `Rc<RefCell<AppState>>`; the renderer reads `ScenePoints` from it.

use crate::constants::*;
use glam::Vec3;
use rand::prelude::*;
use std::ops::Range;
use tree_core::{
    sample_source_image, sparkles, star_position, starfield, tree_group_offset, ActiveColors,
    ColorBuffer, FieldConfig, ParticleField, PointSet, SourceImage, TreeError, UploadOutcome,
    UploadTicket, SPARKLE_COLOR, SPARKLE_COUNT, SPARKLE_EXTENT, STARFIELD_COUNT, STARFIELD_DEPTH,
    STARFIELD_RADIUS, STAR_COLOR,
};
use tree_core::{generate_field_with_rng, OrbitCamera};

/// Instance index ranges of each draw group within [`ScenePoints`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawRanges {
    pub tree: Range<u32>,
    pub star: Range<u32>,
    pub sparkles: Range<u32>,
    pub starfield: Range<u32>,
}

/// Instance data: tree particles first (so their colors can be rewritten at
/// offset 0), then the star topper, sparkles and starfield.
#[derive(Clone, Debug, Default)]
pub struct ScenePoints {
    pub position_size: Vec<[f32; 4]>,
    pub colors: Vec<[f32; 3]>,
    pub ranges: DrawRanges,
}

impl ScenePoints {
    pub fn len(&self) -> usize {
        self.position_size.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position_size.is_empty()
    }

    pub fn tree_count(&self) -> usize {
        self.ranges.tree.len()
    }

    fn push(&mut self, position: Vec3, size: f32, colors: &[[f32; 3]]) {
        self.position_size
            .push([position.x, position.y, position.z, size]);
        self.colors.extend_from_slice(colors);
    }

    fn push_points(&mut self, positions: &[Vec3], size: f32, colors: &[[f32; 3]]) -> Range<u32> {
        let start = self.len() as u32;
        self.position_size
            .extend(positions.iter().map(|p| [p.x, p.y, p.z, size]));
        self.colors.extend_from_slice(colors);
        start..self.len() as u32
    }
}

pub struct AppState {
    pub config: FieldConfig,
    pub field: ParticleField,
    pub colors: ActiveColors,
    pub stars: PointSet,
    pub sparkles: PointSet,
    pub camera: OrbitCamera,
    pub music_playing: bool,
    /// Bumped whenever `field` is replaced.
    pub field_revision: u64,
}

impl AppState {
    pub fn new(config: FieldConfig) -> Result<Self, TreeError> {
        Self::with_rng(config, &mut thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(config: FieldConfig, rng: &mut R) -> Result<Self, TreeError> {
        let field = generate_field_with_rng(&config, rng)?;
        let colors = ActiveColors::new(&field);
        let stars = starfield(STARFIELD_COUNT, STARFIELD_RADIUS, STARFIELD_DEPTH, rng);
        let sparkles = sparkles(SPARKLE_COUNT, SPARKLE_EXTENT, SPARKLE_COLOR, rng);
        Ok(Self {
            config,
            field,
            colors,
            stars,
            sparkles,
            camera: OrbitCamera::default(),
            music_playing: false,
            field_revision: 0,
        })
    }

    /// Draw a fresh tree with the same config. Photo colors are dropped
    /// because they were keyed to the old surface coordinates.
    pub fn regenerate(&mut self) -> Result<(), TreeError> {
        self.regenerate_with_rng(&mut thread_rng())
    }

    pub fn regenerate_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), TreeError> {
        let field = generate_field_with_rng(&self.config, rng)?;
        self.colors.reset(&field);
        self.field = field;
        self.field_revision += 1;
        Ok(())
    }

    pub fn toggle_music(&mut self) -> bool {
        self.music_playing = !self.music_playing;
        self.music_playing
    }

    pub fn has_photo(&self) -> bool {
        self.colors.source() == tree_core::ColorSource::Image
    }

    pub fn clear_photo(&mut self) {
        self.colors.clear();
    }

    /// Start a photo selection; its ticket supersedes every earlier one.
    pub fn begin_photo(&mut self) -> UploadTicket {
        self.colors.begin_upload()
    }

    /// The selected file could not be read. Older selections stay retired.
    pub fn abandon_photo(&mut self, ticket: UploadTicket) -> bool {
        self.colors.abandon_upload(ticket)
    }

    /// Whether a selection newer than the displayed colors is still loading.
    pub fn photo_pending(&self) -> bool {
        self.colors.has_pending_upload()
    }

    /// Decode and sample a photo for a previously issued ticket, then try to
    /// make it the active coloring.
    pub fn apply_photo(
        &mut self,
        ticket: UploadTicket,
        bytes: &[u8],
    ) -> Result<UploadOutcome, TreeError> {
        let sampled = sample_photo(self.field.surface_coords(), bytes);
        self.colors.complete_upload(ticket, sampled)
    }

    pub fn scene_points(&self) -> ScenePoints {
        let total = self.field.len() + 1 + self.sparkles.len() + self.stars.len();
        let mut out = ScenePoints {
            position_size: Vec::with_capacity(total),
            colors: Vec::with_capacity(total),
            ranges: DrawRanges::default(),
        };
        out.ranges.tree = out.push_points(
            self.field.positions(),
            TREE_POINT_SIZE,
            self.colors.active().as_slice(),
        );
        let star_start = out.len() as u32;
        let star = tree_group_offset() + star_position(self.field.height());
        out.push(star, STAR_POINT_SIZE, &[STAR_COLOR]);
        out.ranges.star = star_start..out.len() as u32;
        out.ranges.sparkles = out.push_points(
            &self.sparkles.positions,
            SPARKLE_POINT_SIZE,
            self.sparkles.colors.as_slice(),
        );
        out.ranges.starfield = out.push_points(
            &self.stars.positions,
            STARFIELD_POINT_SIZE,
            self.stars.colors.as_slice(),
        );
        out
    }
}

fn sample_photo(coords: &[glam::Vec2], bytes: &[u8]) -> Result<ColorBuffer, TreeError> {
    let image = SourceImage::decode(bytes)?;
    log::info!(
        "[upload] decoded {}x{} photo",
        image.width(),
        image.height()
    );
    Ok(sample_source_image(coords, &image))
}
