use super::*;

fn cfg(scale: u32, border: u32, x: u32, y: u32) -> RenderConfig {
    RenderConfig {
        scale,
        border,
        x,
        y,
    }
}

#[test]
fn shrinks_width_then_height_in_order() {
    let g = resolve(640, 480, 21, &cfg(30, 2, 10, 10)).unwrap();
    // 25 modules: 750 > 640 -> scale 25 (625 px); 625 > 480 -> scale 19 (475 px).
    assert_eq!(g.scale, 19);
    assert_eq!(g.total_px, 475);
    assert_eq!(g.border_px, 38);
    assert_eq!(g.code_px(), 21 * 19);
    assert_eq!(g.origin_x, 10);
    assert_eq!(g.origin_y, 5);
}

#[test]
fn fitting_request_is_untouched() {
    let g = resolve(640, 480, 21, &cfg(4, 2, 10, 20)).unwrap();
    assert_eq!(
        g,
        Geometry {
            scale: 4,
            border_px: 8,
            origin_x: 10,
            origin_y: 20,
            total_px: 100,
            qrwidth: 21,
        }
    );
}

#[test]
fn position_clamp_is_inclusive_of_the_edge() {
    // 21 px symbol ending exactly at the right/bottom edge stays put.
    let g = resolve(100, 100, 21, &cfg(1, 0, 79, 79)).unwrap();
    assert_eq!((g.origin_x, g.origin_y), (79, 79));

    let g = resolve(100, 100, 21, &cfg(1, 0, 80, 1000)).unwrap();
    assert_eq!((g.origin_x, g.origin_y), (79, 79));
}

#[test]
fn symbol_exactly_filling_the_frame() {
    let g = resolve(25, 25, 21, &cfg(3, 2, 7, 7)).unwrap();
    assert_eq!(g.scale, 1);
    assert_eq!(g.total_px, 25);
    assert_eq!((g.origin_x, g.origin_y), (0, 0));
}

#[test]
fn too_small_frame_is_a_geometry_error() {
    let err = resolve(24, 480, 21, &cfg(1, 2, 0, 0)).unwrap_err();
    assert!(matches!(err, QrStampError::Geometry(_)));
    let err = resolve(640, 20, 21, &cfg(8, 0, 0, 0)).unwrap_err();
    assert!(matches!(err, QrStampError::Geometry(_)));
}

#[test]
fn rejects_empty_inputs() {
    assert!(matches!(
        resolve(0, 10, 21, &cfg(1, 0, 0, 0)),
        Err(QrStampError::Validation(_))
    ));
    assert!(matches!(
        resolve(10, 10, 0, &cfg(1, 0, 0, 0)),
        Err(QrStampError::Validation(_))
    ));
    assert!(matches!(
        resolve(10, 10, 1, &cfg(0, 0, 0, 0)),
        Err(QrStampError::Validation(_))
    ));
}

#[test]
fn huge_requests_do_not_overflow() {
    let g = resolve(1920, 1080, 177, &cfg(u32::MAX, 4, u32::MAX, u32::MAX)).unwrap();
    assert_eq!(g.scale, 1080 / 185);
    assert!(g.origin_x + g.total_px <= 1920);
    assert!(g.origin_y + g.total_px <= 1080);

    assert!(resolve(u32::MAX, u32::MAX, 21, &cfg(1, u32::MAX, 0, 0)).is_err());
}

#[test]
fn resolving_is_pure() {
    let c = cfg(30, 2, 600, 600);
    assert_eq!(
        resolve(640, 480, 21, &c).unwrap(),
        resolve(640, 480, 21, &c).unwrap()
    );
}

#[test]
fn rectangle_always_inside_frame() {
    for fw in [1u32, 2, 3, 20, 21, 22, 47, 100, 641] {
        for fh in [1u32, 2, 21, 25, 33, 99, 480] {
            for qrwidth in [1u32, 2, 21, 25] {
                for scale in [1u32, 2, 7, 255] {
                    for border in [0u32, 1, 4, 40] {
                        for (x, y) in [(0, 0), (5, 3), (u32::MAX, 9), (fw, fh)] {
                            match resolve(fw, fh, qrwidth, &cfg(scale, border, x, y)) {
                                Ok(g) => {
                                    assert!(g.scale >= 1 && g.scale <= scale);
                                    assert_eq!(g.total_px, g.scale * (2 * border + qrwidth));
                                    assert!(g.origin_x + g.total_px <= fw);
                                    assert!(g.origin_y + g.total_px <= fh);
                                }
                                Err(e) => {
                                    assert!(matches!(e, QrStampError::Geometry(_)));
                                    assert!(2 * border + qrwidth > fw.min(fh));
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
