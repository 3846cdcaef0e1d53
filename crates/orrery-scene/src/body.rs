//! The body table: per-body motion constants and render handles.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::frame::{RenderBackend, TextureBinding};

/// Radius multiplier applied to every planet's relative size.
const BASE_RADIUS: f32 = 0.08;
/// Uniform shrink applied to every body when it is drawn.
const DISPLAY_SCALE: f32 = 0.53;

/// A drawable body, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Body {
    pub const ALL: [Body; 9] = [
        Body::Sun,
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
        }
    }

    /// File name of the body's equirectangular texture.
    pub fn texture_file(self) -> &'static str {
        match self {
            Body::Sun => "sun.bmp",
            Body::Mercury => "mercury.bmp",
            Body::Venus => "venus.bmp",
            Body::Earth => "earth.bmp",
            Body::Mars => "mars.bmp",
            Body::Jupiter => "jupiter.bmp",
            Body::Saturn => "saturn.bmp",
            Body::Uranus => "uranus.bmp",
            Body::Neptune => "neptune.bmp",
        }
    }

    /// Built-in motion constants for this body.
    pub fn params(self) -> BodyParams {
        BODY_PARAMS[self as usize]
    }
}

/// Motion and size constants of one body.
///
/// Rates are revolutions per animation cycle. The radial offset is the
/// signed distance along -Z before spinning; the orbit ring is drawn at its
/// absolute value so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyParams {
    pub orbital_rate: f32,
    pub spin_rate: f32,
    pub orbit_radius_offset: f32,
    /// Display radius of the sphere.
    pub radius: f32,
    /// Drawn without lighting (the sun is the light source).
    pub self_luminous: bool,
}

impl BodyParams {
    /// Radius of the orbit ring, or `None` for a body that sits at the origin.
    pub fn ring_radius(&self) -> Option<f32> {
        (self.orbit_radius_offset != 0.0).then(|| self.orbit_radius_offset.abs())
    }
}

const fn planet(orbital_rate: f32, spin_rate: f32, distance: f32, size: f32) -> BodyParams {
    BodyParams {
        orbital_rate,
        spin_rate,
        orbit_radius_offset: -(distance * 0.5 + 1.0),
        radius: BASE_RADIUS * size * DISPLAY_SCALE,
        self_luminous: false,
    }
}

const BODY_PARAMS: [BodyParams; 9] = [
    BodyParams {
        orbital_rate: 0.0,
        spin_rate: 0.0,
        orbit_radius_offset: 0.0,
        radius: DISPLAY_SCALE,
        self_luminous: true,
    },
    planet(5.0, 0.01, 0.35, 1.0),
    planet(1.95, 0.01507, 0.67, 2.48),
    planet(1.2, 1.76, 0.92, 2.61),
    planet(0.6, 1.76, 1.41, 1.39),
    planet(0.1, 4.265, 4.83, 28.66),
    planet(0.041, 3.946, 8.90, 23.87),
    planet(0.015, 2.386, 17.87, 10.4),
    planet(0.0075, 2.623, 27.98, 10.09),
];

/// Where a body is at a given phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalTransform {
    /// Rotation about +Y around the origin, degrees.
    pub orbital_deg: f32,
    /// Rotation about +Y around the body's own center, degrees.
    pub spin_deg: f32,
    pub radial_offset: f32,
}

impl OrbitalTransform {
    pub fn of(params: &BodyParams, phase: f32) -> Self {
        Self {
            orbital_deg: 360.0 * phase * params.orbital_rate,
            spin_deg: 360.0 * phase * params.spin_rate,
            radial_offset: params.orbit_radius_offset,
        }
    }

    /// Orbit, then translate out along Z, then spin in place.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.orbital_deg.to_radians())
            * Mat4::from_translation(Vec3::new(0.0, 0.0, self.radial_offset))
            * Mat4::from_rotation_y(self.spin_deg.to_radians())
    }

    /// Center of the body in world space.
    pub fn position(&self) -> Vec3 {
        self.matrix().transform_point3(Vec3::ZERO)
    }
}

/// Render-side resources of one body, created by the backend.
pub struct BodyResources<B: RenderBackend> {
    pub mesh: B::Mesh,
    pub texture: TextureBinding<B::Texture>,
    pub ring: Option<B::Lines>,
}

/// One row of the body table.
pub struct BodyRecord<B: RenderBackend> {
    pub body: Body,
    pub params: BodyParams,
    pub mesh: B::Mesh,
    pub texture: TextureBinding<B::Texture>,
    pub ring: Option<B::Lines>,
}

/// All bodies in [`Body::ALL`] order. Immutable once built.
pub struct BodyTable<B: RenderBackend> {
    records: Vec<BodyRecord<B>>,
}

impl<B: RenderBackend> BodyTable<B> {
    /// Build the table by asking `load` for each body's resources in draw order.
    pub fn build<E>(
        mut load: impl FnMut(Body, &BodyParams) -> Result<BodyResources<B>, E>,
    ) -> Result<Self, E> {
        let mut records = Vec::with_capacity(Body::ALL.len());
        for body in Body::ALL {
            let params = body.params();
            let BodyResources {
                mesh,
                texture,
                ring,
            } = load(body, &params)?;
            records.push(BodyRecord {
                body,
                params,
                mesh,
                texture,
                ring,
            });
        }
        Ok(Self { records })
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyRecord<B>> {
        self.records.iter()
    }

    pub fn get(&self, body: Body) -> &BodyRecord<B> {
        &self.records[body as usize]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
