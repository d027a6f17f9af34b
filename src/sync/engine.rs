use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_with::SerializeDisplay;
use strum_macros::Display;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::animation_toggle::{AnimationSelection, ToggleDecision, decide};
use super::colour_edit::{PendingColourEdit, combine};
use super::layout::{LayoutChange, layout_changes};
use crate::client::DeviceClient;
use crate::codec::{AnimationMode, CodecError, DeviceStatus, Hsv, Percentage};
use crate::config::DeviceConfig;
use crate::error::DeviceError;

/// How current the cached status is.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Display, SerializeDisplay)]
#[strum(serialize_all = "snake_case")]
pub enum Freshness {
    /// No status has been read yet.
    Uninitialized,
    /// Read within the last poll interval.
    Fresh,
    /// Older than the poll interval.
    Stale,
}

/// A status snapshot and when it was read.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CachedStatus {
    status: DeviceStatus,
    captured_at: Instant,
}

impl CachedStatus {
    #[must_use]
    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    #[must_use]
    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }

    fn is_stale(&self, poll_interval: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.captured_at) > poll_interval
    }
}

struct EngineInner {
    client: DeviceClient,
    poll_interval: Duration,
    snapshot: watch::Sender<Option<CachedStatus>>,
    pending_colour: Mutex<PendingColourEdit>,
    animation_on: Mutex<bool>,
}

impl EngineInner {
    async fn refresh(&self) -> Result<DeviceStatus, DeviceError> {
        let status = self.client.get_status().await?;
        self.snapshot.send_replace(Some(CachedStatus {
            status,
            captured_at: Instant::now(),
        }));
        Ok(status)
    }

    fn last_known(&self) -> Option<DeviceStatus> {
        self.snapshot.borrow().map(|cached| cached.status)
    }
}

struct Poller {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Keeps a bounded-staleness copy of the device status and arbitrates
/// writes that depend on it.
///
/// Reads never touch the network: they answer from the cached snapshot and
/// fail with [`DeviceError::StaleOrUnavailable`] once it is older than the
/// poll interval.
pub struct SyncEngine {
    inner: Arc<EngineInner>,
    poller: Option<Poller>,
}

impl SyncEngine {
    /// Creates an engine that considers a snapshot stale after `poll_interval`.
    #[must_use]
    pub fn new(client: DeviceClient, poll_interval: Duration) -> Self {
        let (snapshot, _) = watch::channel(None);
        Self {
            inner: Arc::new(EngineInner {
                client,
                poll_interval,
                snapshot,
                pending_colour: Mutex::new(PendingColourEdit::default()),
                animation_on: Mutex::new(false),
            }),
            poller: None,
        }
    }

    /// Creates an engine using the configured poll interval.
    #[must_use]
    pub fn from_config(client: DeviceClient, config: &DeviceConfig) -> Self {
        Self::new(client, config.poll_interval())
    }

    /// The client writes go through.
    #[must_use]
    pub fn client(&self) -> &DeviceClient {
        &self.inner.client
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.inner.poll_interval
    }

    /// Reads the status once and replaces the cached snapshot.
    ///
    /// On failure the previous snapshot is kept.
    ///
    /// # Errors
    ///
    /// Returns the status-read error.
    #[instrument(skip(self), level = "debug")]
    pub async fn refresh(&self) -> Result<DeviceStatus, DeviceError> {
        self.inner.refresh().await
    }

    /// Starts the background poll task. Does nothing if it is already running.
    ///
    /// The first poll happens immediately. Failed polls are logged and the
    /// loop carries on with the next tick.
    pub fn start_polling(&mut self) {
        if self.poller.is_some() {
            debug!("polling already running");
            return;
        }
        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_loop(Arc::clone(&self.inner), cancel.clone()));
        self.poller = Some(Poller { cancel, task });
    }

    /// Stops the background poll task and waits for it to finish.
    pub async fn stop_polling(&mut self) {
        let Some(Poller { cancel, task }) = self.poller.take() else {
            return;
        };
        cancel.cancel();
        if let Err(error) = task.await {
            warn!(?error, "poll task ended abnormally");
        }
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    /// Streams every snapshot stored from now on, starting with the current one if any.
    pub fn subscribe(&self) -> impl Stream<Item = DeviceStatus> + Send + Unpin + 'static {
        WatchStream::new(self.inner.snapshot.subscribe())
            .filter_map(|cached| cached.map(|cached| cached.status))
    }

    /// Classifies the cached snapshot.
    #[must_use]
    pub fn freshness(&self) -> Freshness {
        match *self.inner.snapshot.borrow() {
            None => Freshness::Uninitialized,
            Some(cached) if cached.is_stale(self.inner.poll_interval, Instant::now()) => {
                Freshness::Stale
            }
            Some(_) => Freshness::Fresh,
        }
    }

    /// The cached snapshot with its capture time, of any age.
    #[must_use]
    pub fn cached(&self) -> Option<CachedStatus> {
        *self.inner.snapshot.borrow()
    }

    /// The cached status, if it is fresh.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::StaleOrUnavailable`] when no status has been
    /// read or the last one is older than the poll interval.
    pub fn status(&self) -> Result<DeviceStatus, DeviceError> {
        match self.freshness() {
            Freshness::Fresh => self
                .inner
                .last_known()
                .ok_or(DeviceError::StaleOrUnavailable),
            Freshness::Uninitialized | Freshness::Stale => Err(DeviceError::StaleOrUnavailable),
        }
    }

    /// # Errors
    ///
    /// Returns [`DeviceError::StaleOrUnavailable`] as for [`SyncEngine::status`].
    pub fn is_on(&self) -> Result<bool, DeviceError> {
        Ok(self.status()?.is_on())
    }

    /// # Errors
    ///
    /// Returns [`DeviceError::StaleOrUnavailable`] as for [`SyncEngine::status`].
    pub fn brightness_percentage(&self) -> Result<f64, DeviceError> {
        Ok(self.status()?.brightness_percentage())
    }

    /// # Errors
    ///
    /// Returns [`DeviceError::StaleOrUnavailable`] as for [`SyncEngine::status`].
    pub fn white_brightness_percentage(&self) -> Result<f64, DeviceError> {
        Ok(self.status()?.white_brightness_percentage())
    }

    /// # Errors
    ///
    /// Returns [`DeviceError::StaleOrUnavailable`] as for [`SyncEngine::status`].
    pub fn animation_speed_percentage(&self) -> Result<f64, DeviceError> {
        Ok(self.status()?.animation_speed_percentage())
    }

    /// # Errors
    ///
    /// Returns [`DeviceError::StaleOrUnavailable`] as for [`SyncEngine::status`].
    pub fn hue(&self) -> Result<u16, DeviceError> {
        Ok(self.status()?.hsv().hue)
    }

    /// # Errors
    ///
    /// Returns [`DeviceError::StaleOrUnavailable`] as for [`SyncEngine::status`].
    pub fn saturation(&self) -> Result<u8, DeviceError> {
        Ok(self.status()?.hsv().saturation)
    }

    /// Whether the device is running anything other than the static preset.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::StaleOrUnavailable`] as for [`SyncEngine::status`].
    pub fn animation_active(&self) -> Result<bool, DeviceError> {
        Ok(self.status()?.animation_kind().is_animated())
    }

    /// # Errors
    ///
    /// Returns [`DeviceError::StaleOrUnavailable`] as for [`SyncEngine::status`].
    pub fn animation_selection(&self) -> Result<AnimationSelection, DeviceError> {
        Ok(AnimationSelection::from_kind(self.status()?.animation_kind()))
    }

    /// Whether a hue or saturation change is waiting for its partner.
    #[must_use]
    pub fn has_pending_colour_edit(&self) -> bool {
        !self.inner.pending_colour.lock().is_empty()
    }

    /// Switches power, skipping the write when the cached status already matches.
    ///
    /// # Errors
    ///
    /// Returns the client error from the idempotent on/off.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_power(&self, on: bool) -> Result<(), DeviceError> {
        if self.inner.last_known().is_some_and(|status| status.is_on() == on) {
            debug!(on, "power already in requested state");
            return Ok(());
        }
        if on {
            self.inner.client.on().await
        } else {
            self.inner.client.off().await
        }
    }

    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    pub async fn set_brightness_percentage(&self, value: Percentage) -> Result<(), DeviceError> {
        self.inner.client.set_brightness_percentage(value).await
    }

    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    pub async fn set_white_brightness_percentage(
        &self,
        value: Percentage,
    ) -> Result<(), DeviceError> {
        self.inner.client.set_white_brightness_percentage(value).await
    }

    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    pub async fn set_animation_speed_percentage(
        &self,
        value: Percentage,
    ) -> Result<(), DeviceError> {
        self.inner.client.set_animation_speed_percentage(value).await
    }

    /// Records a hue change, writing the colour once a saturation is also pending.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidParameter`] when `hue` is above 360,
    /// leaving the pending edit untouched. Returns
    /// [`DeviceError::StaleOrUnavailable`] when the pair is complete but no
    /// status has ever been read (the edit stays pending), or the
    /// colour-write error.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_hue(&self, hue: u16) -> Result<(), DeviceError> {
        if hue > Hsv::MAX_HUE {
            return Err(CodecError::InvalidParameter {
                reason: format!("hue {hue} is out of range (0..={})", Hsv::MAX_HUE),
            }
            .into());
        }
        self.stage_colour(|edit| edit.with_hue(hue)).await
    }

    /// Records a saturation change, writing the colour once a hue is also pending.
    ///
    /// # Errors
    ///
    /// As for [`SyncEngine::set_hue`], with saturation limited to 100.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_saturation(&self, saturation: u8) -> Result<(), DeviceError> {
        if saturation > Hsv::MAX_PERCENT {
            return Err(CodecError::InvalidParameter {
                reason: format!(
                    "saturation {saturation} is out of range (0..={})",
                    Hsv::MAX_PERCENT
                ),
            }
            .into());
        }
        self.stage_colour(|edit| edit.with_saturation(saturation))
            .await
    }

    async fn stage_colour(
        &self,
        update: impl FnOnce(PendingColourEdit) -> PendingColourEdit,
    ) -> Result<(), DeviceError> {
        let colour = {
            let mut pending = self.inner.pending_colour.lock();
            *pending = update(*pending);
            let Some((hue, saturation)) = pending.complete() else {
                debug!("waiting for the other half of the colour edit");
                return Ok(());
            };
            let Some(status) = self.inner.last_known() else {
                return Err(DeviceError::StaleOrUnavailable);
            };
            *pending = PendingColourEdit::default();
            combine(hue, saturation, status.hsv().value)
        };
        debug!(%colour, "writing combined colour edit");
        self.inner.client.set_color(colour).await
    }

    /// Selects a preset, or starts dream-mode cycling.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    #[instrument(skip(self), level = "debug", fields(selection = %selection))]
    pub async fn select_animation(&self, selection: AnimationSelection) -> Result<(), DeviceError> {
        match selection {
            AnimationSelection::Preset(mode) => self.inner.client.set_animation_mode(mode).await,
            AnimationSelection::Dream => self.inner.client.set_dream_mode_auto().await,
        }
    }

    /// Turns animation on (dream-mode cycling) or off (static preset).
    ///
    /// The write is skipped only when both the last request and the last
    /// known device mode already match `active`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Transport`] when the write fails.
    #[instrument(skip(self), level = "debug")]
    pub async fn set_animation_active(&self, active: bool) -> Result<(), DeviceError> {
        let device_animated = self
            .inner
            .last_known()
            .map(|status| status.animation_kind().is_animated());
        let decision = {
            let mut flag = self.inner.animation_on.lock();
            let decision = decide(active, device_animated, *flag);
            if decision.writes() {
                *flag = active;
            }
            decision
        };

        match decision {
            ToggleDecision::AlreadyActive => {
                debug!("animation already active");
                Ok(())
            }
            ToggleDecision::AlreadyInactive => {
                debug!("animation already inactive");
                Ok(())
            }
            ToggleDecision::Start => self.inner.client.set_dream_mode_auto().await,
            ToggleDecision::Stop => {
                self.inner
                    .client
                    .set_animation_mode(AnimationMode::Static)
                    .await
            }
        }
    }

    /// Writes chip type, colour order and strip size where the device differs from `config`.
    ///
    /// The status is polled first and the returned list names every write made.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::StaleOrUnavailable`] when the status cannot be
    /// read, or the first failed write.
    #[instrument(skip(self, config), level = "debug", fields(chip = %config.chip()))]
    pub async fn apply_layout(&self, config: &DeviceConfig) -> Result<Vec<LayoutChange>, DeviceError> {
        let status = match self.refresh().await {
            Ok(status) => status,
            Err(error) => {
                error!(%error, "unable to poll status before applying layout");
                return Err(DeviceError::StaleOrUnavailable);
            }
        };

        let changes = layout_changes(&status, config);
        for change in &changes {
            info!(%change, "applying layout");
            let client = &self.inner.client;
            match *change {
                LayoutChange::ChipType(chip) => client.set_chip_type(chip).await?,
                LayoutChange::ColorOrder(order) => client.set_color_order(order).await?,
                LayoutChange::Segments(count) => client.set_segments(count).await?,
                LayoutChange::LedsPerSegment(count) => client.set_leds_per_segment(count).await?,
            }
        }
        Ok(changes)
    }
}

impl Drop for SyncEngine {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel.cancel();
        }
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("client", &self.inner.client)
            .field("poll_interval", &self.inner.poll_interval)
            .field("freshness", &self.freshness())
            .field("polling", &self.is_polling())
            .finish()
    }
}

async fn poll_loop(inner: Arc<EngineInner>, cancel: CancellationToken) {
    let mut ticker = interval(inner.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(error) = inner.refresh().await {
                    warn!(%error, peer = %inner.client.peer(), "status poll failed");
                }
            }
        }
    }
    debug!("poll task stopped");
}
