use certpress::{Composer, ComposerConfig, SignatureImage, Theme};
use image::{Rgba, RgbaImage};

fn composer() -> Composer {
    Composer::new(ComposerConfig::default(), Theme::elite()).expect("composer")
}

fn tiny_png() -> Vec<u8> {
    let img = RgbaImage::from_pixel(12, 7, Rgba([10, 20, 30, 255]));
    SignatureImage::from_rgba(img).expect("encode").png_data().to_vec()
}

#[cfg(feature = "freehand")]
mod freehand {
    use super::*;

    #[test]
    fn stroke_end_on_non_empty_surface_always_captures() {
        let mut c = composer();
        c.pen_down(40.0, 60.0);
        c.pen_move(100.0, 64.0);
        c.pen_move(160.0, 58.0);
        assert!(c.pen_up().expect("lift"));
        assert!(c.draft().signature().is_some());
    }

    #[test]
    fn stroke_end_on_empty_surface_never_nulls_an_existing_signature() {
        let mut c = composer();
        // A signature exists (e.g. uploaded) while the ink surface is empty
        let mark = SignatureImage::from_rgba(RgbaImage::from_pixel(
            9,
            4,
            Rgba([0, 0, 0, 255]),
        ))
        .expect("encode");
        let captured = mark.png_data().to_vec();
        c.set_signature(Some(mark));

        assert!(!c.pen_up().expect("empty lift"));
        assert_eq!(
            c.draft().signature().expect("still present").png_data(),
            &captured[..]
        );
    }

    #[test]
    fn accumulated_ink_re_exports_on_every_stroke_end() {
        let mut c = composer();
        c.pen_down(40.0, 60.0);
        c.pen_move(100.0, 64.0);
        assert!(c.pen_up().expect("lift"));
        // The surface keeps its ink; a further stroke extends the drawing
        c.pen_down(100.0, 64.0);
        c.pen_move(160.0, 80.0);
        assert!(c.pen_up().expect("lift"));
        let sig = c.draft().signature().expect("captured");
        assert!(sig.width() > 100, "width {}", sig.width());
    }

    #[test]
    fn clear_resets_to_the_placeholder_state() {
        let mut c = composer();
        c.pen_down(10.0, 10.0);
        c.pen_move(80.0, 40.0);
        c.pen_up().expect("lift");
        c.clear_signature();
        assert!(c.draft().signature().is_none());
        assert!(!c.snapshot().has_signature);
    }

    #[test]
    fn capture_is_trimmed_to_the_ink_bounding_box() {
        let mut c = composer();
        // A short horizontal dash in the middle of the 320x128 surface
        c.pen_down(100.0, 64.0);
        c.pen_move(140.0, 64.0);
        c.pen_up().expect("lift");
        let sig = c.draft().signature().expect("captured");
        assert!(sig.width() < 60, "width {}", sig.width());
        assert!(sig.height() < 12, "height {}", sig.height());
    }

    #[test]
    fn recapture_replaces_the_previous_signature_wholesale() {
        let mut c = composer();
        c.pen_down(10.0, 10.0);
        c.pen_move(20.0, 10.0);
        c.pen_up().expect("lift");
        let first = c.draft().signature().expect("first").png_data().to_vec();

        c.clear_signature();
        c.pen_down(10.0, 10.0);
        c.pen_move(200.0, 100.0);
        c.pen_up().expect("lift");
        let second = c.draft().signature().expect("second").png_data().to_vec();
        assert_ne!(first, second);
    }
}

#[cfg(feature = "upload")]
mod upload {
    use super::*;

    #[test]
    fn valid_upload_sets_the_signature() {
        let mut c = composer();
        c.upload_signature(&tiny_png()).expect("upload");
        let sig = c.draft().signature().expect("set");
        assert_eq!((sig.width(), sig.height()), (12, 7));
    }

    #[test]
    fn decode_failure_is_deterministic_and_non_destructive() {
        let mut c = composer();

        // Failure with no prior signature: state stays unset
        assert!(c.upload_signature(b"garbage").is_err());
        assert!(c.draft().signature().is_none());

        // Failure with a prior signature: prior state survives
        c.upload_signature(&tiny_png()).expect("upload");
        assert!(c.upload_signature(b"garbage").is_err());
        assert!(c.draft().signature().is_some());
    }

    #[test]
    fn data_url_uploads_are_equivalent_to_byte_uploads() {
        let mut via_bytes = composer();
        via_bytes.upload_signature(&tiny_png()).expect("upload");
        let url = via_bytes.draft().signature().expect("set").data_url();

        let mut via_url = composer();
        via_url.upload_signature_data_url(&url).expect("upload");
        assert_eq!(
            via_url.draft().signature().expect("set").png_data(),
            via_bytes.draft().signature().expect("set").png_data()
        );
    }

    #[test]
    fn clear_after_upload_shows_the_placeholder() {
        let mut c = composer();
        c.upload_signature(&tiny_png()).expect("upload");
        c.clear_signature();
        assert!(c.draft().signature().is_none());
    }
}
