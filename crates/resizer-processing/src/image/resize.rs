use image::imageops::FilterType;
use image::DynamicImage;
use resizer_core::VersionSpec;

/// Geometry of one version, computed from the source size before any pixel work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePlan {
    /// Output keeps the source dimensions; no resampling
    PassThrough,
    /// Scale to exactly these dimensions (aspect ratio already accounted for)
    Exact { width: u32, height: u32 },
    /// Cover these dimensions and center-crop the overflow
    Fill { width: u32, height: u32 },
}

impl ResizePlan {
    pub fn output_dimensions(self, source: (u32, u32)) -> (u32, u32) {
        match self {
            ResizePlan::PassThrough => source,
            ResizePlan::Exact { width, height } | ResizePlan::Fill { width, height } => {
                (width, height)
            }
        }
    }
}

pub struct ImageResize;

impl ImageResize {
    /// Work out the output geometry of `spec` for a `source` sized image.
    ///
    /// Without enlargement each requested side is capped to the source side,
    /// so the output never grows in either direction. A spec that ends up at
    /// the source size is a pass-through.
    pub fn plan(source: (u32, u32), spec: &VersionSpec) -> ResizePlan {
        let (src_w, src_h) = source;
        if src_w == 0 || src_h == 0 {
            return ResizePlan::PassThrough;
        }

        let cap = |requested: u32, limit: u32| {
            if spec.enlargement {
                requested
            } else {
                requested.min(limit)
            }
        };

        let (width, height, fill) = match (spec.width, spec.height) {
            (None, None) => return ResizePlan::PassThrough,
            (Some(w), None) => {
                let w = cap(w, src_w);
                (w, scale_side(src_h, w, src_w), false)
            }
            (None, Some(h)) => {
                let h = cap(h, src_h);
                (scale_side(src_w, h, src_h), h, false)
            }
            (Some(w), Some(h)) => (cap(w, src_w), cap(h, src_h), true),
        };

        if (width, height) == source {
            ResizePlan::PassThrough
        } else if fill {
            ResizePlan::Fill { width, height }
        } else {
            ResizePlan::Exact { width, height }
        }
    }

    pub fn apply(img: &DynamicImage, plan: ResizePlan) -> DynamicImage {
        let source = (img.width(), img.height());
        match plan {
            ResizePlan::PassThrough => img.clone(),
            ResizePlan::Exact { width, height } => {
                img.resize_exact(width, height, Self::select_filter(source, (width, height)))
            }
            ResizePlan::Fill { width, height } => {
                img.resize_to_fill(width, height, Self::select_filter(source, (width, height)))
            }
        }
    }

    /// Lanczos for downscaling, Catmull-Rom when any side grows
    pub fn select_filter(source: (u32, u32), target: (u32, u32)) -> FilterType {
        if target.0 > source.0 || target.1 > source.1 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }
}

/// `side * numerator / denominator`, rounded, at least 1
fn scale_side(side: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (side as u64 * numerator as u64 + denominator as u64 / 2) / denominator as u64;
    scaled.clamp(1, u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn spec(width: Option<u32>, height: Option<u32>, enlargement: bool) -> VersionSpec {
        VersionSpec::new(width, height).with_enlargement(enlargement)
    }

    #[test]
    fn test_plan_shrink_both_sides() {
        let plan = ImageResize::plan((400, 300), &spec(Some(200), Some(100), false));
        assert_eq!(plan, ResizePlan::Fill { width: 200, height: 100 });
    }

    #[test]
    fn test_plan_width_only_keeps_aspect() {
        let plan = ImageResize::plan((400, 300), &spec(Some(200), None, false));
        assert_eq!(plan, ResizePlan::Exact { width: 200, height: 150 });

        let plan = ImageResize::plan((400, 300), &spec(None, Some(100), false));
        assert_eq!(plan, ResizePlan::Exact { width: 133, height: 100 });
    }

    #[test]
    fn test_plan_without_enlargement_caps_to_source() {
        let plan = ImageResize::plan((100, 80), &spec(Some(400), Some(400), false));
        assert_eq!(plan, ResizePlan::PassThrough);
        assert_eq!(plan.output_dimensions((100, 80)), (100, 80));

        // Only the side that is too large gets capped
        let plan = ImageResize::plan((100, 80), &spec(Some(400), Some(40), false));
        assert_eq!(plan, ResizePlan::Fill { width: 100, height: 40 });

        let plan = ImageResize::plan((100, 80), &spec(Some(1000), None, false));
        assert_eq!(plan, ResizePlan::PassThrough);
    }

    #[test]
    fn test_plan_with_enlargement_grows() {
        let plan = ImageResize::plan((100, 80), &spec(Some(200), None, true));
        assert_eq!(plan, ResizePlan::Exact { width: 200, height: 160 });

        let plan = ImageResize::plan((100, 80), &spec(Some(300), Some(300), true));
        assert_eq!(plan, ResizePlan::Fill { width: 300, height: 300 });
    }

    #[test]
    fn test_plan_exact_source_size_is_pass_through() {
        let plan = ImageResize::plan((64, 48), &spec(Some(64), Some(48), false));
        assert_eq!(plan, ResizePlan::PassThrough);

        let plan = ImageResize::plan((64, 48), &spec(None, None, false));
        assert_eq!(plan, ResizePlan::PassThrough);
    }

    #[test]
    fn test_plan_tiny_results_never_hit_zero() {
        let plan = ImageResize::plan((1000, 1), &spec(Some(10), None, false));
        assert_eq!(plan, ResizePlan::Exact { width: 10, height: 1 });
    }

    #[test]
    fn test_apply_matches_plan() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 20, Rgba([0, 0, 255, 255])));

        for version in [
            spec(Some(10), Some(10), false),
            spec(Some(30), None, false),
            spec(None, Some(60), true),
            spec(Some(80), Some(80), false),
        ] {
            let plan = ImageResize::plan((40, 20), &version);
            let out = ImageResize::apply(&img, plan);
            assert_eq!((out.width(), out.height()), plan.output_dimensions((40, 20)));
        }
    }

    #[test]
    fn test_select_filter() {
        assert_eq!(
            ImageResize::select_filter((100, 100), (50, 50)),
            FilterType::Lanczos3
        );
        assert_eq!(
            ImageResize::select_filter((100, 100), (50, 200)),
            FilterType::CatmullRom
        );
    }
}
