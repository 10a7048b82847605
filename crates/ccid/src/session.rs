//! Card read transaction orchestration
//!
//! A [`CardSession`] owns its transport for the duration of one
//! transaction: power the card on, capture the ATR, request the UID
//! (falling back to an ATR-derived stand-in), classify the card and
//! assemble the [`CardIdentity`]. Dropping the session drops the
//! transport, which releases the underlying connection, so the release
//! happens on every exit path including early error returns.

use tracing::{debug, instrument, trace, warn};

use crate::atr::Atr;
use crate::command::CommandFrame;
use crate::error::{Error, Result, ResultExt};
use crate::identity::CardIdentity;
use crate::response::ResponseFrame;
use crate::transport::CcidTransport;

/// One card read transaction over a CCID transport
#[derive(Debug)]
pub struct CardSession<T: CcidTransport> {
    transport: T,
}

impl<T: CcidTransport> CardSession<T> {
    /// Create a session owning the given transport
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Run the full read transaction
    ///
    /// Power-on failures and a missing ATR yield [`Error::NoCard`] /
    /// [`Error::EmptyAtr`]; a failed UID request is recoverable and falls
    /// back to the ATR-derived stand-in.
    #[instrument(level = "debug", skip(self))]
    pub fn read(&mut self) -> Result<CardIdentity> {
        let atr = self.power_on()?;
        debug!(atr = %atr, "Card powered on");

        let uid = self.request_uid(&atr);
        let card_type = atr.card_type();
        debug!(%card_type, capacity = card_type.capacity(), "Card classified");

        Ok(CardIdentity::new(uid, card_type, &atr))
    }

    /// Consume the session, returning its transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send `IccPowerOn` and capture the ATR from the response payload
    fn power_on(&mut self) -> Result<Atr> {
        let response = self.exchange(&CommandFrame::icc_power_on())?;
        if !response.is_success() {
            debug!(status = response.status(), "Power-on rejected by reader");
            return Err(Error::NoCard);
        }

        let atr = Atr::from_bytes(response.payload());
        if atr.is_empty() {
            return Err(Error::EmptyAtr);
        }
        Ok(atr)
    }

    /// Request the UID via Get Data, falling back to ATR derivation
    ///
    /// The fallback truncates the raw ATR and is not an authoritative
    /// UID; see [`Atr::derived_uid`].
    fn request_uid(&mut self, atr: &Atr) -> Vec<u8> {
        match self.exchange(&CommandFrame::get_uid()) {
            Ok(response) if response.is_success() => {
                response.data_without_status_words().to_vec()
            }
            Ok(response) => {
                warn!(
                    status = response.status(),
                    "Get UID rejected, deriving UID from ATR"
                );
                atr.derived_uid()
            }
            Err(err) => {
                warn!(error = %err, "Get UID failed, deriving UID from ATR");
                atr.derived_uid()
            }
        }
    }

    /// One framed exchange: serialize, transmit, parse
    fn exchange(&mut self, frame: &CommandFrame) -> Result<ResponseFrame> {
        let bytes = frame.to_bytes();
        trace!(tx = %hex::encode_upper(&bytes), "CCID TX");
        let raw = self
            .transport
            .exchange(&bytes)
            .context("CCID exchange failed")?;
        trace!(rx = %hex::encode_upper(&raw), "CCID RX");
        ResponseFrame::parse(&raw)
    }
}
