use rasterfind::{Raster, RasterFindError, RasterView, Rect};

#[test]
fn raster_view_rejects_invalid_dimensions() {
    let data = [0u8; 12];

    let err = RasterView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        RasterFindError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = RasterView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        RasterFindError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn raster_view_rejects_invalid_stride() {
    let data = [0u8; 24];

    let err = RasterView::new(&data, 4, 1, 11).err().unwrap();
    assert_eq!(
        err,
        RasterFindError::InvalidStride {
            width: 4,
            stride: 11,
        }
    );
}

#[test]
fn raster_view_rejects_small_buffer() {
    let data = [0u8; 11];

    // Two rows of two pixels with a padded stride: 8 + 6 bytes.
    let err = RasterView::new(&data, 2, 2, 8).err().unwrap();
    assert_eq!(err, RasterFindError::BufferTooSmall { needed: 14, got: 11 });
}

#[test]
fn padded_view_roi_reads_expected_pixels() {
    // 3x3 pixels, stride 12 (3 padding bytes per row).
    let mut data = vec![0u8; 36];
    for y in 0..3 {
        for x in 0..3 {
            let idx = y * 12 + x * 3;
            data[idx] = (10 * y + x) as u8;
            data[idx + 1] = 100;
            data[idx + 2] = 200;
        }
    }
    let view = RasterView::new(&data, 3, 3, 12).unwrap();
    assert_eq!(view.get(2, 1), Some([12, 100, 200]));
    assert_eq!(view.get(3, 0), None);

    let roi = view.roi(Rect::new(1, 1, 2, 2)).unwrap();
    assert_eq!(roi.stride(), 12);
    assert_eq!(roi.get(0, 0), Some([11, 100, 200]));
    assert_eq!(roi.get(1, 1), Some([22, 100, 200]));
    assert_eq!(roi.row(1), Some(&[21, 100, 200, 22, 100, 200][..]));

    let packed = Raster::from_view(roi).unwrap();
    assert_eq!(packed.data(), &[11, 100, 200, 12, 100, 200, 21, 100, 200, 22, 100, 200]);
}

#[test]
fn roi_out_of_bounds_is_rejected() {
    let raster = Raster::filled(4, 4, [1, 2, 3]).unwrap();
    let err = raster.view().roi(Rect::new(2, 2, 3, 1)).unwrap_err();
    assert!(matches!(err, RasterFindError::RoiOutOfBounds { .. }));
}

#[test]
fn raster_new_requires_exact_length() {
    assert!(Raster::new(vec![0; 12], 2, 2).is_ok());
    assert_eq!(
        Raster::new(vec![0; 11], 2, 2).unwrap_err(),
        RasterFindError::BufferTooSmall { needed: 12, got: 11 }
    );
    assert!(Raster::new(vec![0; 13], 2, 2).is_err());
}

#[test]
fn rect_set_operations() {
    let a = Rect::new(2, 3, 10, 6);
    let b = Rect::new(8, 5, 10, 10);

    assert_eq!((a.right(), a.bottom(), a.area()), (12, 9, 60));
    assert_eq!(a.intersect(&b), Some(Rect::new(8, 5, 4, 4)));
    assert_eq!(a.union(&b), Rect::new(2, 3, 16, 12));
    assert_eq!(a.intersect(&Rect::new(12, 3, 4, 4)), None);
    assert!(a.contains(&Rect::new(3, 4, 2, 2)));
    assert!(!a.contains(&b));
}

#[test]
fn rect_expand_saturates_at_origin() {
    let r = Rect::new(0, 1, 4, 4);
    assert_eq!(r.expand(1), Rect::new(0, 0, 5, 6));
    assert_eq!(Rect::new(3, 3, 2, 2).expand(1).scale(2), Rect::new(4, 4, 8, 8));
}
