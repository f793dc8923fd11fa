/// Fit orthographic shadow-camera extents to projected bounds
use crate::projection::Bounds2D;

/// Left/right/top/bottom of an orthographic view volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoExtents {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl OrthoExtents {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn is_finite(&self) -> bool {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitPolicy {
    /// Extents equal the bounding box, no margin
    #[default]
    Tight,
    /// Square volume centred on the light axis, half-size `max(width, height)`
    Symmetric,
}

impl FitPolicy {
    pub fn toggled(self) -> Self {
        match self {
            FitPolicy::Tight => FitPolicy::Symmetric,
            FitPolicy::Symmetric => FitPolicy::Tight,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FitPolicy::Tight => "tight",
            FitPolicy::Symmetric => "symmetric",
        }
    }
}

impl std::str::FromStr for FitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tight" => Ok(FitPolicy::Tight),
            "symmetric" => Ok(FitPolicy::Symmetric),
            other => Err(format!("unknown fit policy '{other}' (expected tight or symmetric)")),
        }
    }
}

/// Camera extents for `bounds`, or `None` when there is nothing finite to fit
pub fn fit_orthographic_extents(bounds: &Bounds2D, policy: FitPolicy) -> Option<OrthoExtents> {
    if bounds.is_empty() {
        return None;
    }

    let extents = match policy {
        FitPolicy::Tight => OrthoExtents {
            left: bounds.min.x,
            right: bounds.max.x,
            top: bounds.max.y,
            bottom: bounds.min.y,
        },
        FitPolicy::Symmetric => {
            let d = bounds.width().max(bounds.height());
            OrthoExtents {
                left: -d,
                right: d,
                top: d,
                bottom: -d,
            }
        }
    };

    extents.is_finite().then_some(extents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn bounds(min: (f32, f32), max: (f32, f32)) -> Bounds2D {
        Bounds2D {
            min: Point2::new(min.0, min.1),
            max: Point2::new(max.0, max.1),
        }
    }

    #[test]
    fn test_tight_fit() {
        let extents = fit_orthographic_extents(&bounds((-3.0, 1.0), (7.0, 4.0)), FitPolicy::Tight).unwrap();
        assert_eq!(
            extents,
            OrthoExtents {
                left: -3.0,
                right: 7.0,
                top: 4.0,
                bottom: 1.0
            }
        );
    }

    #[test]
    fn test_symmetric_fit() {
        let extents =
            fit_orthographic_extents(&bounds((-3.0, 1.0), (7.0, 4.0)), FitPolicy::Symmetric).unwrap();
        assert_eq!(extents.left, -10.0);
        assert_eq!(extents.right, 10.0);
        assert_eq!(extents.top, 10.0);
        assert_eq!(extents.bottom, -10.0);
    }

    #[test]
    fn test_empty_bounds_not_fitted() {
        assert_eq!(fit_orthographic_extents(&Bounds2D::empty(), FitPolicy::Tight), None);
        assert_eq!(fit_orthographic_extents(&Bounds2D::empty(), FitPolicy::Symmetric), None);
    }

    #[test]
    fn test_non_finite_bounds_not_fitted() {
        let b = bounds((f32::NAN, 0.0), (1.0, 1.0));
        assert_eq!(fit_orthographic_extents(&b, FitPolicy::Tight), None);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Tight".parse::<FitPolicy>(), Ok(FitPolicy::Tight));
        assert_eq!("symmetric".parse::<FitPolicy>(), Ok(FitPolicy::Symmetric));
        assert!("loose".parse::<FitPolicy>().is_err());
        assert_eq!(FitPolicy::Tight.toggled(), FitPolicy::Symmetric);
    }
}
