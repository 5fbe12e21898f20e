use lasithi_shared::features::LonLat;
use lasithi_shared::layers::{MAX_ZOOM, MIN_ZOOM};

pub const DEFAULT_CENTER: LonLat = [26.1, 35.2];
pub const DEFAULT_ZOOM: f64 = 10.0;

// Pan limits around the region (southwest / northeast corners).
pub const BOUNDS_SW: LonLat = [23.0, 34.5];
pub const BOUNDS_NE: LonLat = [26.5, 35.8];

// The world is TILE_SIZE * 2^zoom pixels wide, the usual web-map convention.
const TILE_SIZE: f64 = 512.0;
// Web Mercator blows up toward the poles; clamp latitudes like web maps do.
const MAX_MERCATOR_LAT: f64 = 85.05112878;
const WHEEL_ZOOM_SENSITIVITY: f64 = 0.004;

/// Web Mercator camera over the fixed region: a center and a zoom, both
/// clamped so the map cannot be dragged or zoomed away from the data.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub center: LonLat,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

impl Viewport {
    /// Project lon/lat to absolute world pixel coordinates at this zoom.
    pub fn project(&self, lonlat: LonLat) -> (f64, f64) {
        let size = world_size(self.zoom);
        let [lon, lat] = lonlat;
        let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
        let x = (lon + 180.0) / 360.0 * size;
        let lat_rad = lat.to_radians();
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0
            * size;
        (x, y)
    }

    /// Inverse of [`Viewport::project`].
    pub fn unproject(&self, x: f64, y: f64) -> LonLat {
        let size = world_size(self.zoom);
        let lon = x / size * 360.0 - 180.0;
        let lat = (std::f64::consts::PI * (1.0 - 2.0 * y / size))
            .sinh()
            .atan()
            .to_degrees();
        [lon, lat]
    }

    /// Map lon/lat to canvas pixels for a surface of the given CSS size.
    pub fn lonlat_to_screen(&self, lonlat: LonLat, width: f64, height: f64) -> (f64, f64) {
        let (x, y) = self.project(lonlat);
        let (cx, cy) = self.project(self.center);
        (x - cx + width / 2.0, y - cy + height / 2.0)
    }

    /// Geographic position under a canvas pixel.
    pub fn screen_to_lonlat(&self, sx: f64, sy: f64, width: f64, height: f64) -> LonLat {
        let (cx, cy) = self.project(self.center);
        self.unproject(cx + sx - width / 2.0, cy + sy - height / 2.0)
    }

    /// Pan by a screen-space delta, keeping the center inside the region
    /// bounds. Dragging right moves the geography right, so the center
    /// shifts the opposite way.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.project(self.center);
        self.center = self.unproject(cx - dx, cy - dy);
        self.clamp_center();
    }

    /// Wheel zoom toward a focus point, keeping the geography under the
    /// cursor fixed while the zoom stays inside its range.
    pub fn zoom_at(&mut self, delta: f64, sx: f64, sy: f64, width: f64, height: f64) {
        let anchor = self.screen_to_lonlat(sx, sy, width, height);
        let zoom = (self.zoom - delta * WHEEL_ZOOM_SENSITIVITY).clamp(MIN_ZOOM, MAX_ZOOM);
        if (zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        self.zoom = zoom;

        // Re-center so the anchor lands back under the cursor.
        let (ax, ay) = self.project(anchor);
        self.center = self.unproject(ax - (sx - width / 2.0), ay - (sy - height / 2.0));
        self.clamp_center();
    }

    fn clamp_center(&mut self) {
        self.center[0] = self.center[0].clamp(BOUNDS_SW[0], BOUNDS_NE[0]);
        self.center[1] = self.center[1].clamp(BOUNDS_SW[1], BOUNDS_NE[1]);
    }
}
