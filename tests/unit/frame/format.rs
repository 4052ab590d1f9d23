use super::*;

#[test]
fn full_contrast_follows_color_model() {
    assert!(ColorModel::Rgb.is_full_contrast(2));
    assert!(ColorModel::Gray.is_full_contrast(0));
    assert!(ColorModel::Yuv.is_full_contrast(0));
    assert!(!ColorModel::Yuv.is_full_contrast(1));
    assert!(!ColorModel::Yuv.is_full_contrast(2));
}

#[test]
fn names_parse_back_case_insensitively() {
    for fmt in PixelFormat::ALL {
        assert_eq!(fmt.name().parse::<PixelFormat>().unwrap(), fmt);
        assert_eq!(
            fmt.name().to_ascii_lowercase().parse::<PixelFormat>().unwrap(),
            fmt
        );
    }
    assert!("P010".parse::<PixelFormat>().is_err());
}

#[test]
fn every_preset_validates_against_its_own_size() {
    for fmt in PixelFormat::ALL {
        for (w, h) in [(1, 1), (2, 2), (3, 5), (17, 9), (64, 48)] {
            for align in [1, 4] {
                let info = fmt.frame_info_aligned(w, h, align);
                let len = info.min_buffer_len();
                info.validate(len)
                    .unwrap_or_else(|e| panic!("{fmt} {w}x{h} align {align}: {e}"));
                assert!(info.validate(len - 1).is_err(), "{fmt} {w}x{h}");
                assert!(len <= info.size, "{fmt} {w}x{h}: {len} > {}", info.size);
            }
        }
    }
}

#[test]
fn i420_layout_matches_conventional_offsets() {
    let info = PixelFormat::I420.frame_info(6, 4);
    assert_eq!(info.color_model, ColorModel::Yuv);
    assert_eq!(info.planes[0].stride, 8);
    assert_eq!(info.planes[1].offset, 32);
    assert_eq!(info.planes[1].stride, 4);
    assert_eq!(info.planes[2].offset, 32 + 8);
    assert_eq!((info.planes[1].hsub, info.planes[1].vsub), (1, 1));
    assert_eq!(info.size, 48);
    // The last chroma row has no trailing padding to touch.
    assert_eq!(info.min_buffer_len(), 47);
}

#[test]
fn nv12_chroma_is_interleaved() {
    let info = PixelFormat::Nv12.frame_info_aligned(4, 4, 1);
    assert_eq!(info.planes[1].offset + 1, info.planes[2].offset);
    assert_eq!(info.planes[1].pixel_stride, 2);
    assert_eq!(info.min_buffer_len(), 16 + 8);
    assert_eq!(info.size, 16 + 8);

    let info = PixelFormat::Nv21.frame_info_aligned(4, 4, 1);
    assert_eq!(info.planes[2].offset + 1, info.planes[1].offset);
}

#[test]
fn packed_rgb_orders_components() {
    let rgb = PixelFormat::Rgb.frame_info_aligned(2, 1, 1);
    let bgrx = PixelFormat::Bgrx.frame_info_aligned(2, 1, 1);
    assert_eq!(
        rgb.planes.iter().map(|p| p.offset).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(
        bgrx.planes.iter().map(|p| p.offset).collect::<Vec<_>>(),
        vec![2, 1, 0]
    );
    assert_eq!(bgrx.planes[0].pixel_stride, 4);
}
