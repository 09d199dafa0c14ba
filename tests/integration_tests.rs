use certpress::{
    qr, Composer, ComposerConfig, ExportOptions, Theme, VerificationToken,
};

fn composer_with(theme: Theme) -> Composer {
    Composer::new(ComposerConfig::default(), theme).expect("composer")
}

#[test]
fn displayed_name_is_the_upper_cased_input_and_reaches_the_filename() {
    let mut composer = composer_with(Theme::elite());
    composer.set_recipient_name("ada lovelace");
    assert_eq!(composer.draft().recipient_name(), "ADA LOVELACE");

    let artifact = composer.export(&ExportOptions::default()).expect("export");
    assert!(artifact.filename().contains("ADA LOVELACE"));
    assert!(artifact.filename().ends_with(".png"));
}

#[test]
fn qr_payload_is_a_pure_function_of_the_recipient_name() {
    let domain = Theme::elite().verify_domain;
    assert_eq!(
        qr::verify_url(&domain, "Jane Doe"),
        format!("https://{}/verify/jane-doe", domain)
    );
    // Independent of other state: same name, different composers, same URL
    let mut a = composer_with(Theme::elite());
    let mut b = composer_with(Theme::elite());
    a.set_recipient_name("Jane Doe");
    b.set_recipient_name("Jane Doe");
    b.set_issuer_name("Someone Entirely Different");
    assert_eq!(a.snapshot().verify_url, b.snapshot().verify_url);
}

#[test]
fn export_succeeds_for_the_untouched_default_draft() {
    // No signature, empty name: export must still produce a decodable PNG
    let mut composer = composer_with(Theme::elite());
    let artifact = composer.export(&ExportOptions::default()).expect("export");
    assert!(!artifact.png_data().is_empty());

    let decoded = image::load_from_memory(artifact.png_data()).expect("decodable PNG");
    assert_eq!(decoded.width(), 2000);
    assert_eq!(decoded.height(), 1400);
    assert!(artifact.filename().contains("YOUR FULL NAME"));
}

#[test]
fn end_to_end_compose_sign_and_export() {
    let mut composer = composer_with(Theme::elite());
    composer.set_recipient_name("ADA LOVELACE");
    composer.set_issuer_name("Grace Hopper");

    #[cfg(feature = "freehand")]
    {
        composer.pen_down(30.0, 50.0);
        composer.pen_move(90.0, 70.0);
        composer.pen_move(150.0, 40.0);
        assert!(composer.pen_up().expect("capture"));
    }

    let artifact = composer.export(&ExportOptions::default()).expect("export");
    assert!(artifact.filename().contains("ADA LOVELACE"));
    assert!(artifact.filename().ends_with(".png"));
    let decoded = image::load_from_memory(artifact.png_data()).expect("valid PNG");
    assert_eq!(decoded.width(), Theme::elite().width * 2);
}

#[test]
fn identical_state_exports_identical_bytes() {
    let fixed = |scale: u32| {
        let mut composer = composer_with(Theme::elite());
        composer.set_recipient_name("Jane Doe");
        composer.set_issuer_name("Grace Hopper");
        composer.set_issue_date_display("1 January 2026");
        composer.set_verification(VerificationToken::from_parts("CP", 2026, 123456));
        composer.export(&ExportOptions { scale }).expect("export")
    };
    let a = fixed(2);
    let b = fixed(2);
    assert_eq!(a.content_hash(), b.content_hash());

    // A different scale is a different bitmap
    let c = fixed(1);
    assert_ne!(a.content_hash(), c.content_hash());
}

#[test]
fn export_observes_the_most_recently_committed_state() {
    let mut composer = composer_with(Theme::elite());
    composer.set_recipient_name("First Name");
    composer.set_issue_date_display("1 January 2026");
    composer.set_verification(VerificationToken::from_parts("CP", 2026, 1));
    let first = composer.export(&ExportOptions { scale: 1 }).expect("export");

    composer.set_recipient_name("Second Name");
    let second = composer.export(&ExportOptions { scale: 1 }).expect("export");

    assert_ne!(first.content_hash(), second.content_hash());
    assert!(second.filename().contains("SECOND NAME"));
}

#[test]
fn transparent_theme_exports_transparent_corners() {
    let mut composer = composer_with(Theme::midnight());
    composer.set_recipient_name("Jane Doe");
    let artifact = composer.export(&ExportOptions { scale: 1 }).expect("export");
    let decoded = image::load_from_memory(artifact.png_data())
        .expect("valid PNG")
        .to_rgba8();
    // The frame occupies the corner; sample just inside it instead
    let inset = Theme::midnight().frame_width + Theme::midnight().inner_inset + 4;
    let p = decoded.get_pixel(inset, decoded.height() / 2);
    assert_eq!(p.0[3], 0, "expected transparent backdrop, got {:?}", p);
}

#[test]
fn opaque_theme_exports_a_filled_backdrop() {
    let mut composer = composer_with(Theme::elite());
    let artifact = composer.export(&ExportOptions { scale: 1 }).expect("export");
    let decoded = image::load_from_memory(artifact.png_data())
        .expect("valid PNG")
        .to_rgba8();
    let p = decoded.get_pixel(decoded.width() / 2, decoded.height() / 2);
    assert_eq!(p.0[3], 255);
}

#[test]
fn verification_token_survives_renders_and_exports() {
    let mut composer = composer_with(Theme::elite());
    let token = composer.snapshot().verification;
    composer.set_recipient_name("A");
    composer.export(&ExportOptions { scale: 1 }).expect("export");
    composer.set_recipient_name("B");
    composer.export(&ExportOptions { scale: 1 }).expect("export");
    assert_eq!(composer.snapshot().verification, token);
}
