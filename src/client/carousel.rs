//! Per-offer code carousel used by the offers page.
//!
//! Masking a code only changes what is displayed. The code itself is already
//! in the offer payload, so nothing here is access control.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::warn;
use serde::Deserialize;
use thiserror::Error;

use crate::models::offer::{Offer, OfferCode};

/// How long the "copied" badge stays up.
pub const COPIED_FLASH: Duration = Duration::from_secs(2);
/// Horizontal drag needed before a swipe changes the code.
pub const SWIPE_THRESHOLD_PX: f64 = 50.0;
pub const MASKED_CODE: &str = "••••••••";
pub const DEFAULT_REDEEM_ROUTE: &str = "/notes";
pub const LOGIN_ROUTE: &str = "/login";

/// The signed-in student as kept in client storage (plain JSON, not verified).
#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl SessionUser {
    /// Parse the stored user object; missing, `null` or malformed entries mean "no session".
    pub fn from_storage(raw: Option<&str>) -> Option<Self> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }
        serde_json::from_str::<Option<SessionUser>>(raw).ok().flatten()
    }
}

#[derive(Error, Debug)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard that just remembers the last value written.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum CarouselError {
    #[error("sign in to see this code")]
    LoginRequired,

    #[error("offer has no codes")]
    NoCode,

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Route inside the site.
    Internal(String),
    /// External page, opened in a new tab.
    NewTab(String),
}

#[derive(Debug, Clone)]
pub struct CodeCarousel {
    codes: Vec<OfferCode>,
    index: usize,
    revealed: bool,
    copied_at: Option<Instant>,
    login_required: bool,
    redeem_link: Option<String>,
}

impl CodeCarousel {
    pub fn for_offer(offer: &Offer) -> Self {
        Self {
            codes: offer.code_sequence(),
            index: 0,
            revealed: false,
            copied_at: None,
            login_required: offer.login_required,
            redeem_link: offer
                .redeem_link
                .as_ref()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&OfferCode> {
        self.codes.get(self.index)
    }

    pub fn next(&mut self) {
        if !self.codes.is_empty() {
            self.index = (self.index + 1) % self.codes.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.codes.is_empty() {
            self.index = (self.index + self.codes.len() - 1) % self.codes.len();
        }
    }

    /// Apply a finished horizontal drag. Returns whether the code changed.
    pub fn swipe(&mut self, dx: f64) -> bool {
        if dx > SWIPE_THRESHOLD_PX {
            self.prev();
        } else if dx < -SWIPE_THRESHOLD_PX {
            self.next();
        } else {
            return false;
        }
        self.codes.len() > 1
    }

    fn allowed(&self, session: Option<&SessionUser>) -> bool {
        !self.login_required || session.is_some()
    }

    pub fn reveal(&mut self, session: Option<&SessionUser>) -> Result<(), CarouselError> {
        if !self.allowed(session) {
            return Err(CarouselError::LoginRequired);
        }
        self.revealed = true;
        Ok(())
    }

    pub fn hide(&mut self) {
        self.revealed = false;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Text for the code slot: the code once revealed, a fixed mask before.
    pub fn display(&self) -> &str {
        match self.current() {
            None => "",
            Some(code) if self.revealed => code.code.as_str(),
            Some(_) => MASKED_CODE,
        }
    }

    /// Copy the current code and start the "copied" flash.
    pub fn copy(
        &mut self,
        clipboard: &mut dyn Clipboard,
        session: Option<&SessionUser>,
        now: Instant,
    ) -> Result<String, CarouselError> {
        if !self.allowed(session) {
            return Err(CarouselError::LoginRequired);
        }
        let code = self.current().ok_or(CarouselError::NoCode)?.code.clone();
        clipboard.write_text(&code)?;
        self.copied_at = Some(now);
        Ok(code)
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPIED_FLASH)
    }

    /// Copy the current code, then send the student to the redeem page.
    ///
    /// Without a required session nothing is copied and the student is sent to login.
    pub fn redeem(
        &mut self,
        clipboard: &mut dyn Clipboard,
        session: Option<&SessionUser>,
        now: Instant,
    ) -> Navigation {
        match self.copy(clipboard, session, now) {
            Ok(_) => {}
            Err(CarouselError::LoginRequired) => return Navigation::Internal(LOGIN_ROUTE.to_string()),
            Err(e) => warn!("Redeeming without copying a code: {}", e),
        }

        match self.redeem_link.as_deref() {
            Some(link) if link.starts_with("http://") || link.starts_with("https://") => {
                Navigation::NewTab(link.to_string())
            }
            Some(link) => Navigation::Internal(link.to_string()),
            None => Navigation::Internal(DEFAULT_REDEEM_ROUTE.to_string()),
        }
    }
}

/// Carousel state for every offer on the page, each one independent.
#[derive(Debug, Default)]
pub struct OfferCarousels {
    carousels: HashMap<String, CodeCarousel>,
}

impl OfferCarousels {
    /// State for a stored offer; `None` when the offer has no id yet.
    pub fn for_offer(&mut self, offer: &Offer) -> Option<&mut CodeCarousel> {
        let key = offer.id?.to_hex();
        Some(
            self.carousels
                .entry(key)
                .or_insert_with(|| CodeCarousel::for_offer(offer)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::offer::tests::sample_offer;
    use mongodb::bson::oid::ObjectId;

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError("permission denied".into()))
        }
    }

    fn student() -> SessionUser {
        SessionUser::from_storage(Some(r#"{"_id":"u1","name":"Asha"}"#)).unwrap()
    }

    #[test]
    fn next_wraps_back_to_start() {
        let mut carousel = CodeCarousel::for_offer(&sample_offer());
        let n = carousel.len();
        assert_eq!(n, 3);
        for _ in 0..n {
            carousel.next();
        }
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn prev_then_next_is_identity() {
        let mut carousel = CodeCarousel::for_offer(&sample_offer());
        for start in 0..carousel.len() {
            while carousel.index() != start {
                carousel.next();
            }
            carousel.prev();
            carousel.next();
            assert_eq!(carousel.index(), start);
        }
    }

    #[test]
    fn prev_from_first_goes_to_last() {
        let mut carousel = CodeCarousel::for_offer(&sample_offer());
        carousel.prev();
        assert_eq!(carousel.current().unwrap().code, "FRIEND5");
    }

    #[test]
    fn masked_display_never_shows_code() {
        let mut carousel = CodeCarousel::for_offer(&sample_offer());
        for _ in 0..carousel.len() {
            let code = carousel.current().unwrap().code.clone();
            assert!(!carousel.display().contains(&code));
            carousel.next();
        }

        carousel.reveal(None).unwrap();
        assert_eq!(carousel.display(), "EXAM20");
        carousel.hide();
        assert_eq!(carousel.display(), MASKED_CODE);
    }

    #[test]
    fn copy_flag_clears_after_two_seconds() {
        let mut carousel = CodeCarousel::for_offer(&sample_offer());
        let mut clipboard = MemoryClipboard::default();
        let t0 = Instant::now();

        carousel.next();
        let copied = carousel.copy(&mut clipboard, None, t0).unwrap();
        assert_eq!(copied, "EXAM10");
        assert_eq!(clipboard.contents.as_deref(), Some("EXAM10"));
        assert!(carousel.is_copied(t0 + Duration::from_millis(1999)));
        assert!(!carousel.is_copied(t0 + COPIED_FLASH));
    }

    #[test]
    fn swipe_needs_threshold() {
        let mut carousel = CodeCarousel::for_offer(&sample_offer());
        assert!(!carousel.swipe(30.0));
        assert_eq!(carousel.index(), 0);
        assert!(carousel.swipe(-80.0));
        assert_eq!(carousel.index(), 1);
        assert!(carousel.swipe(51.0));
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn login_gate_blocks_reveal_copy_and_redeem() {
        let mut offer = sample_offer();
        offer.login_required = true;
        let mut carousel = CodeCarousel::for_offer(&offer);
        let mut clipboard = MemoryClipboard::default();
        let now = Instant::now();

        assert!(matches!(carousel.reveal(None), Err(CarouselError::LoginRequired)));
        assert_eq!(carousel.display(), MASKED_CODE);
        assert!(matches!(
            carousel.copy(&mut clipboard, None, now),
            Err(CarouselError::LoginRequired)
        ));
        assert_eq!(
            carousel.redeem(&mut clipboard, None, now),
            Navigation::Internal(LOGIN_ROUTE.to_string())
        );
        assert!(clipboard.contents.is_none());

        let user = student();
        carousel.reveal(Some(&user)).unwrap();
        assert_eq!(carousel.display(), "EXAM20");
    }

    #[test]
    fn redeem_targets() {
        let mut clipboard = MemoryClipboard::default();
        let now = Instant::now();

        let mut offer = sample_offer();
        let mut carousel = CodeCarousel::for_offer(&offer);
        assert_eq!(
            carousel.redeem(&mut clipboard, None, now),
            Navigation::Internal(DEFAULT_REDEEM_ROUTE.to_string())
        );
        assert_eq!(clipboard.contents.as_deref(), Some("EXAM20"));

        offer.redeem_link = Some("https://store.example.com/checkout".into());
        let mut carousel = CodeCarousel::for_offer(&offer);
        assert_eq!(
            carousel.redeem(&mut clipboard, None, now),
            Navigation::NewTab("https://store.example.com/checkout".into())
        );

        offer.redeem_link = Some("/quantum".into());
        let mut carousel = CodeCarousel::for_offer(&offer);
        assert_eq!(
            carousel.redeem(&mut BrokenClipboard, None, now),
            Navigation::Internal("/quantum".into())
        );
    }

    #[test]
    fn empty_sequence_is_inert() {
        let mut offer = sample_offer();
        offer.promo_code = None;
        offer.additional_promo_codes.clear();
        let mut carousel = CodeCarousel::for_offer(&offer);
        carousel.next();
        carousel.prev();
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.display(), "");
        assert!(matches!(
            carousel.copy(&mut MemoryClipboard::default(), None, Instant::now()),
            Err(CarouselError::NoCode)
        ));
    }

    #[test]
    fn carousels_are_independent_per_offer() {
        let mut first = sample_offer();
        first.id = Some(ObjectId::new());
        let mut second = sample_offer();
        second.id = Some(ObjectId::new());

        let mut board = OfferCarousels::default();
        board.for_offer(&first).unwrap().next();
        board.for_offer(&first).unwrap().next();
        assert_eq!(board.for_offer(&first).unwrap().index(), 2);
        assert_eq!(board.for_offer(&second).unwrap().index(), 0);
    }

    #[test]
    fn unsaved_offers_get_no_shared_state() {
        let mut board = OfferCarousels::default();
        let draft = sample_offer();
        assert!(draft.id.is_none());
        assert!(board.for_offer(&draft).is_none());
        assert!(board.carousels.is_empty());
    }

    #[test]
    fn session_parsing() {
        assert!(SessionUser::from_storage(None).is_none());
        assert!(SessionUser::from_storage(Some("null")).is_none());
        assert!(SessionUser::from_storage(Some("{not json")).is_none());
        assert_eq!(student().name.as_deref(), Some("Asha"));
    }
}
