//! Curved link geometry.
//!
//! Links are drawn as circular arcs whose radius grows with the distance between
//! their endpoints, so edges between nearby node pairs fan out instead of
//! overlapping as straight lines.

/// Endpoint distances below this are treated as this value.
pub const MIN_DISTANCE: f64 = 1e-3;

/// Arc radius relative to the endpoint distance.
pub const CURVATURE: f64 = 1.5;

/// A clockwise (screen-space) circular arc from a source to a target point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkArc {
	/// Center x.
	pub cx: f64,
	/// Center y.
	pub cy: f64,
	/// Arc radius; never below `MIN_DISTANCE`.
	pub radius: f64,
	/// Angle of the source endpoint.
	pub start_angle: f64,
	/// Angle of the target endpoint, always after `start_angle`.
	pub end_angle: f64,
}

impl LinkArc {
	/// Small clockwise arc of radius `CURVATURE * distance` through both endpoints.
	/// Coincident endpoints produce a tiny arc rather than NaNs.
	pub fn between(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
		let (dx, dy) = (x2 - x1, y2 - y1);
		let raw = (dx * dx + dy * dy).sqrt();
		let (ux, uy) = if raw < MIN_DISTANCE {
			(1.0, 0.0)
		} else {
			(dx / raw, dy / raw)
		};
		let dist = raw.max(MIN_DISTANCE);
		let radius = dist * CURVATURE;

		// Center sits to the right of travel, which makes the short way round clockwise.
		let half = dist / 2.0;
		let offset = (radius * radius - half * half).sqrt();
		let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
		let (cx, cy) = (mx - uy * offset, my + ux * offset);

		let start_angle = (y1 - cy).atan2(x1 - cx);
		let mut end_angle = (y2 - cy).atan2(x2 - cx);
		if end_angle < start_angle {
			end_angle += std::f64::consts::TAU;
		}

		Self {
			cx,
			cy,
			radius,
			start_angle,
			end_angle,
		}
	}

	/// Point on the circle at `angle`.
	pub fn point_at(&self, angle: f64) -> (f64, f64) {
		(
			self.cx + self.radius * angle.cos(),
			self.cy + self.radius * angle.sin(),
		)
	}

	/// Unit direction of travel at `angle`.
	pub fn tangent_at(&self, angle: f64) -> (f64, f64) {
		(-angle.sin(), angle.cos())
	}

	/// Angle `trim` arc-length units before the end, never earlier than the start.
	pub fn trimmed_end(&self, trim: f64) -> f64 {
		(self.end_angle - trim / self.radius).max(self.start_angle)
	}

	/// Angle `trim` arc-length units after the start, never later than the end.
	pub fn trimmed_start(&self, trim: f64) -> f64 {
		(self.start_angle + trim / self.radius).min(self.end_angle)
	}

	/// Angular length of the arc.
	pub fn sweep(&self) -> f64 {
		self.end_angle - self.start_angle
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: (f64, f64), b: (f64, f64)) -> bool {
		(a.0 - b.0).abs() < 1e-6 && (a.1 - b.1).abs() < 1e-6
	}

	#[test]
	fn arc_passes_through_both_endpoints() {
		let arc = LinkArc::between(10.0, 20.0, 200.0, -40.0);
		assert!(close(arc.point_at(arc.start_angle), (10.0, 20.0)));
		assert!(close(arc.point_at(arc.end_angle), (200.0, -40.0)));
	}

	#[test]
	fn radius_scales_with_distance() {
		let short = LinkArc::between(0.0, 0.0, 100.0, 0.0);
		let long = LinkArc::between(0.0, 0.0, 300.0, 0.0);
		assert!((short.radius - 150.0).abs() < 1e-9);
		assert!((long.radius - 450.0).abs() < 1e-9);
		// Same relative curvature regardless of length.
		assert!((short.sweep() - long.sweep()).abs() < 1e-9);
	}

	#[test]
	fn left_to_right_bulges_upward() {
		let arc = LinkArc::between(-50.0, 0.0, 50.0, 0.0);
		assert!(arc.cy > 0.0);
		let mid = arc.point_at((arc.start_angle + arc.end_angle) / 2.0);
		assert!(mid.1 < 0.0);
		assert!(arc.sweep() > 0.0 && arc.sweep() < std::f64::consts::PI);
	}

	#[test]
	fn coincident_endpoints_stay_finite() {
		let arc = LinkArc::between(5.0, 5.0, 5.0, 5.0);
		for v in [arc.cx, arc.cy, arc.radius, arc.start_angle, arc.end_angle] {
			assert!(v.is_finite());
		}
		let t = arc.tangent_at(arc.trimmed_end(30.0));
		assert!(t.0.is_finite() && t.1.is_finite());
	}

	#[test]
	fn trimming_never_crosses_over() {
		let arc = LinkArc::between(0.0, 0.0, 20.0, 0.0);
		assert_eq!(arc.trimmed_end(1_000.0), arc.start_angle);
		assert_eq!(arc.trimmed_start(1_000.0), arc.end_angle);
	}
}
