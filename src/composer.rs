//! The certificate composer: one object owning the draft, theme, and
//! render cache for a session
//!
//! Every mutation invalidates the cached render and fires the change
//! callback, so an export that follows any edit always rasterizes the most
//! recently committed state. There are no process-wide singletons; a session
//! is exactly one `Composer`.

use image::RgbaImage;
use log::debug;
use serde::Serialize;

use crate::draft::{CertificateDraft, VerificationToken};
use crate::error::Result;
use crate::qr::verify_url;
use crate::rendering::font::TypeFace;
use crate::rendering::layout::compose_scene;
use crate::rendering::raster::rasterize;
#[cfg(feature = "freehand")]
use crate::signature::SignaturePad;
use crate::signature::SignatureImage;
use crate::theme::Theme;
use crate::ComposerConfig;

/// A lightweight read-only view of the draft, handed to change callbacks
/// and serializable for session inspection.
#[derive(Debug, Clone, Serialize)]
pub struct DraftSnapshot {
    pub recipient_name: String,
    pub issuer_name: String,
    pub issue_date_display: String,
    pub has_signature: bool,
    pub verification: String,
    pub verify_url: String,
}

type ChangeCallback = Box<dyn Fn(&DraftSnapshot) + Send + Sync + 'static>;

/// The single logical component behind every visual variant: form state,
/// signature capture, and rendering, with the styling delegated to a
/// [`Theme`].
pub struct Composer {
    config: ComposerConfig,
    theme: Theme,
    draft: CertificateDraft,
    face: TypeFace,
    #[cfg(feature = "freehand")]
    pad: SignaturePad,
    cache: Option<(u32, RgbaImage)>,
    on_change: Option<ChangeCallback>,
}

impl Composer {
    /// Create a composer for one session. The theme is validated up front;
    /// the draft starts empty with a frozen verification token.
    pub fn new(config: ComposerConfig, theme: Theme) -> Result<Self> {
        theme.validate()?;
        let face = match &config.font_file {
            Some(path) => TypeFace::load_truetype(path)?,
            None if config.use_system_font => match TypeFace::find_system_font() {
                Some(path) => TypeFace::load_truetype(&path)?,
                None => TypeFace::Builtin,
            },
            None => TypeFace::Builtin,
        };
        #[cfg(feature = "freehand")]
        let pad = SignaturePad::new(config.pad_width, config.pad_height, config.pen_width)?;
        let draft = CertificateDraft::new(&theme.token_prefix);
        Ok(Self {
            config,
            theme,
            draft,
            face,
            #[cfg(feature = "freehand")]
            pad,
            cache: None,
            on_change: None,
        })
    }

    pub fn draft(&self) -> &CertificateDraft {
        &self.draft
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Store the recipient name (upper-cased by the draft).
    pub fn set_recipient_name(&mut self, name: &str) {
        self.draft.set_recipient_name(name);
        self.committed();
    }

    pub fn set_issuer_name(&mut self, name: &str) {
        self.draft.set_issuer_name(name);
        self.committed();
    }

    /// Replace the signature wholesale; `None` clears it.
    pub fn set_signature(&mut self, signature: Option<SignatureImage>) {
        self.draft.set_signature(signature);
        self.committed();
    }

    /// Re-issue hook: replace the frozen verification token.
    pub fn set_verification(&mut self, token: VerificationToken) {
        self.draft.set_verification(token);
        self.committed();
    }

    /// Override the formatted issue date (re-issue and deterministic tests).
    pub fn set_issue_date_display(&mut self, display: &str) {
        self.draft.set_issue_date_display(display);
        self.committed();
    }

    /// Swap the visual theme; the draft is untouched.
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        theme.validate()?;
        self.theme = theme;
        self.committed();
        Ok(())
    }

    /// Decode uploaded signature bytes into the draft. On decode failure the
    /// prior signature state is left untouched.
    #[cfg(feature = "upload")]
    pub fn upload_signature(&mut self, bytes: &[u8]) -> Result<()> {
        let sig = SignatureImage::from_bytes(bytes)?;
        self.draft.set_signature(Some(sig));
        self.committed();
        Ok(())
    }

    /// Decode a base64 `data:` URL into the draft, same failure semantics as
    /// `upload_signature`.
    #[cfg(feature = "upload")]
    pub fn upload_signature_data_url(&mut self, url: &str) -> Result<()> {
        let sig = SignatureImage::from_data_url(url)?;
        self.draft.set_signature(Some(sig));
        self.committed();
        Ok(())
    }

    /// Begin a freehand stroke on the ink surface.
    #[cfg(feature = "freehand")]
    pub fn pen_down(&mut self, x: f32, y: f32) {
        self.pad.pen_down(x, y);
    }

    /// Continue the current freehand stroke.
    #[cfg(feature = "freehand")]
    pub fn pen_move(&mut self, x: f32, y: f32) {
        self.pad.pen_move(x, y);
    }

    /// End the stroke. A non-empty surface captures the trimmed ink as the
    /// draft's signature and returns `true`; an empty surface is a no-op and
    /// never overwrites a previously captured signature.
    #[cfg(feature = "freehand")]
    pub fn pen_up(&mut self) -> Result<bool> {
        match self.pad.end_stroke()? {
            Some(sig) => {
                self.draft.set_signature(Some(sig));
                self.committed();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clear the ink surface and null the draft's signature; the render
    /// falls back to the dashed placeholder.
    pub fn clear_signature(&mut self) {
        #[cfg(feature = "freehand")]
        self.pad.clear();
        self.draft.set_signature(None);
        self.committed();
    }

    /// Register a callback fired after every committed mutation.
    pub fn on_change<F>(&mut self, cb: F)
    where
        F: Fn(&DraftSnapshot) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(cb));
    }

    /// Remove a previously registered change callback, if any.
    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    /// A serializable view of the current draft.
    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            recipient_name: self.draft.recipient_name().to_string(),
            issuer_name: self.draft.issuer_name().to_string(),
            issue_date_display: self.draft.issue_date_display().to_string(),
            has_signature: self.draft.signature().is_some(),
            verification: self.draft.verification().to_string(),
            verify_url: verify_url(&self.theme.verify_domain, self.draft.recipient_name()),
        }
    }

    /// Rasterize the certificate at the given scale, reusing the cached
    /// bitmap when no mutation occurred since the last render.
    pub fn render(&mut self, scale: u32) -> Result<&RgbaImage> {
        let stale = match &self.cache {
            Some((cached_scale, _)) => *cached_scale != scale,
            None => true,
        };
        if stale {
            debug!("render cache miss at scale {}", scale);
            let scene = compose_scene(&self.draft, &self.theme, &self.face)?;
            let img = rasterize(&scene, scale, &self.face)?;
            self.cache = Some((scale, img));
        }
        match &self.cache {
            Some((_, img)) => Ok(img),
            None => Err(crate::Error::RenderCapture(
                "render cache unexpectedly empty".to_string(),
            )),
        }
    }

    /// Invalidate the render cache and notify the change listener.
    fn committed(&mut self) {
        self.cache = None;
        if let Some(cb) = &self.on_change {
            cb(&self.snapshot());
        }
    }
}
