//! Gravity module - the signed fall rate and the ticker derived from it
//!
//! A positive rate produces periodic `Down` moves, a negative one periodic `Up`
//! moves, and zero means no periodic motion at all (no ticker exists). Every rate
//! change replaces the ticker; the replacement starts stopped and the owner decides
//! when to unfreeze it.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::ticker::{TickStamp, Ticker};
use crate::types::{Direction, MAX_SPEED};

/// Callback receiving the direction of each gravity step
pub type GravityCallback = Arc<dyn Fn(Direction, TickStamp) + Send + Sync + 'static>;

pub struct Gravity {
    rate: f64,
    ticker: Option<Ticker>,
    on_tick: GravityCallback,
}

impl Gravity {
    /// Zero gravity, no ticker
    pub fn new(on_tick: GravityCallback) -> Self {
        Self {
            rate: 0.0,
            ticker: None,
            on_tick,
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Direction of the periodic move, `None` at rate zero
    pub fn direction(&self) -> Option<Direction> {
        direction_for(self.rate)
    }

    /// Period between moves, `None` at rate zero
    pub fn interval(&self) -> Option<Duration> {
        self.ticker.as_ref().map(Ticker::interval)
    }

    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_running)
    }

    /// Install a new rate. The magnitude is clamped to `MAX_SPEED`; non-finite
    /// rates and rates too slow for a `Duration` period count as zero. The
    /// previous ticker is dropped and the new one is left stopped.
    pub fn set_rate(&mut self, rate: f64) {
        let period = |rate: f64| Duration::try_from_secs_f64(1.0 / rate.abs()).ok();
        let rate = if rate.is_finite() {
            rate.clamp(-MAX_SPEED, MAX_SPEED)
        } else {
            0.0
        };

        if let Some(old) = self.ticker.take() {
            old.stop();
        }

        let (Some(direction), Some(interval)) = (direction_for(rate), period(rate)) else {
            self.rate = 0.0;
            debug!("gravity disabled");
            return;
        };
        self.rate = rate;

        let on_tick = Arc::clone(&self.on_tick);
        self.ticker = Some(Ticker::new(interval, move |stamp| on_tick(direction, stamp)));
        debug!(rate, ?interval, ?direction, "gravity rate set");
    }

    /// Pause the ticker, keeping the rate and the phase
    pub fn freeze(&self) {
        if let Some(ticker) = &self.ticker {
            ticker.pause();
        }
    }

    /// Resume a frozen ticker or start a fresh one
    pub fn unfreeze(&self) {
        if let Some(ticker) = &self.ticker {
            ticker.resume();
        }
    }

    pub fn stop(&self) {
        if let Some(ticker) = &self.ticker {
            ticker.stop();
        }
    }

    /// Check whether a tick still belongs to the current, running ticker run
    pub fn accepts(&self, stamp: TickStamp) -> bool {
        match &self.ticker {
            Some(ticker) => {
                ticker.id() == stamp.ticker_id
                    && ticker.epoch() == stamp.epoch
                    && ticker.is_running()
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn current_stamp(&self) -> Option<TickStamp> {
        self.ticker.as_ref().map(|ticker| TickStamp {
            ticker_id: ticker.id(),
            epoch: ticker.epoch(),
        })
    }
}

impl std::fmt::Debug for Gravity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gravity")
            .field("rate", &self.rate)
            .field("ticker", &self.ticker)
            .finish()
    }
}

fn direction_for(rate: f64) -> Option<Direction> {
    if rate > 0.0 {
        Some(Direction::Down)
    } else if rate < 0.0 {
        Some(Direction::Up)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gravity() -> Gravity {
        Gravity::new(Arc::new(|_, _| {}))
    }

    #[test]
    fn test_new_gravity_has_no_ticker() {
        let g = gravity();
        assert_eq!(g.rate(), 0.0);
        assert_eq!(g.direction(), None);
        assert_eq!(g.interval(), None);
        assert!(!g.is_running());
    }

    #[test]
    fn test_set_rate_derives_direction_and_interval() {
        let mut g = gravity();
        g.set_rate(2.0);
        assert_eq!(g.direction(), Some(Direction::Down));
        assert_eq!(g.interval(), Some(Duration::from_millis(500)));
        assert!(!g.is_running());

        g.set_rate(-1.0);
        assert_eq!(g.direction(), Some(Direction::Up));
        assert_eq!(g.interval(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_set_rate_clamps_magnitude() {
        let mut g = gravity();
        g.set_rate(100.0);
        assert_eq!(g.rate(), MAX_SPEED);
        g.set_rate(-100.0);
        assert_eq!(g.rate(), -MAX_SPEED);
        g.set_rate(f64::NAN);
        assert_eq!(g.rate(), 0.0);
        assert_eq!(g.interval(), None);
    }

    #[test]
    fn test_set_rate_too_slow_for_a_period_disables_gravity() {
        let mut g = gravity();
        g.set_rate(1.0);
        for rate in [1e-300, -1e-300, f64::MIN_POSITIVE, 5e-324] {
            g.set_rate(rate);
            assert_eq!(g.rate(), 0.0, "{:e}", rate);
            assert_eq!(g.direction(), None);
            assert_eq!(g.interval(), None);
            assert!(!g.is_running());
        }

        // A slow but representable rate still gets a ticker.
        g.set_rate(1e-6);
        assert_eq!(g.direction(), Some(Direction::Down));
        assert!(g.interval().is_some());
    }

    #[test]
    fn test_freeze_unfreeze() {
        let mut g = gravity();
        g.set_rate(1.0);
        g.unfreeze();
        assert!(g.is_running());
        g.freeze();
        assert!(!g.is_running());
        g.unfreeze();
        assert!(g.is_running());
        g.stop();
        assert!(!g.is_running());
    }

    #[test]
    fn test_accepts_only_current_run() {
        let mut g = gravity();
        g.set_rate(1.0);
        g.unfreeze();
        let ticker = g.ticker.as_ref().unwrap();
        let current = TickStamp {
            ticker_id: ticker.id(),
            epoch: ticker.epoch(),
        };
        assert!(g.accepts(current));

        // A pause invalidates ticks already in flight.
        g.freeze();
        g.unfreeze();
        assert!(!g.accepts(current));

        // So does replacing the ticker.
        let ticker = g.ticker.as_ref().unwrap();
        let current = TickStamp {
            ticker_id: ticker.id(),
            epoch: ticker.epoch(),
        };
        g.set_rate(2.0);
        g.unfreeze();
        assert!(!g.accepts(current));
    }
}
