//! Compose a sample certificate with a freehand signature and write it to
//! the current directory.
//! Run with: cargo run --example compose_sample

use certpress::{Composer, ComposerConfig, ExportOptions, Theme};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut composer = Composer::new(ComposerConfig::default(), Theme::elite())?;

    // Sample draft values, mirroring the pre-filled form
    composer.set_recipient_name("Dafa Putra Nawawi");
    composer.set_issuer_name("Andri Haryanto");

    #[cfg(feature = "freehand")]
    {
        // A small scribble standing in for pointer input
        composer.pen_down(30.0, 70.0);
        for i in 1..=40 {
            let x = 30.0 + i as f32 * 4.0;
            let y = 70.0 + (i as f32 * 0.6).sin() * 18.0;
            composer.pen_move(x, y);
        }
        composer.pen_up()?;
    }

    let artifact = composer.export(&ExportOptions::default())?;
    let path = artifact.write_to(std::path::Path::new("."))?;
    println!(
        "wrote {} ({} bytes, {:?})",
        path.display(),
        artifact.png_data().len(),
        artifact.dimensions()
    );
    println!("verify: {}", composer.snapshot().verify_url);
    Ok(())
}
