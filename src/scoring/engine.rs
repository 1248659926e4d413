//! Weighted composite scoring engine.
//!
//! Evaluates every signal in a fixed order, accumulating one weighted
//! contribution per signal into the component map and one human-readable
//! reason per triggered rule. Missing inputs contribute 0; nothing here
//! produces NaN.

use std::collections::BTreeMap;

use crate::config::ScanConfig;
use crate::indicators::{atr, bollinger, donchian, ema, macd};
use crate::models::{ScoreResult, TickerMetrics};
use crate::scoring::norm::norm;
use crate::scoring::prescreen::{early_setup_score, squeeze_score};

const EMA_FAST: usize = 10;
const EMA_SLOW: usize = 50;
const ATR_PERIOD: usize = 14;
const ATR_REGIME_WINDOW: usize = 30;
const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_K: f64 = 2.0;
const DONCHIAN_PERIOD: usize = 20;

pub struct ScoreEngine {
    top_pick_threshold: f64,
}

impl ScoreEngine {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            top_pick_threshold: config.top_pick_threshold,
        }
    }

    /// Score one symbol. Pure: identical metrics yield identical output.
    pub fn score(&self, m: &TickerMetrics) -> ScoreResult {
        let mut acc = Accumulator::default();

        let closes = m.closes();
        let highs = m.highs();
        let lows = m.lows();

        // Rule-based pre-screen heuristics also count toward the total.
        let squeeze = squeeze_score(m);
        acc.add("squeeze", squeeze, 1.0);
        if squeeze > 0.0 {
            acc.reason(format!("Squeeze setup score {:.0}", squeeze));
        }

        let early = early_setup_score(m);
        acc.add("early_setup", early, 1.0);
        if early > 0.0 {
            acc.reason(format!("Early setup score {:.0}", early));
        }

        // Volume versus the trailing 20-day average.
        if let Some(avg20) = m.avg20_volume.filter(|v| *v > 0.0) {
            let vol_score = norm(m.volume, avg20 * 1.5, avg20 * 5.0);
            acc.add("volume", vol_score, 1.0);
            if vol_score > 0.0 {
                acc.reason(format!(
                    "Volume {:.0} at {:.1}x 20-day average",
                    m.volume,
                    m.volume / avg20
                ));
            }

            if m.volume_spike {
                let spike_score = norm(m.volume, avg20 * 1.5, avg20 * 4.0);
                acc.add("spike", spike_score, 2.0);
                if spike_score > 0.0 {
                    acc.reason("Volume spike in progress".to_string());
                }
            } else {
                acc.add("spike", 0.0, 2.0);
            }
        } else {
            acc.add("volume", 0.0, 1.0);
            acc.add("spike", 0.0, 2.0);
        }

        // RSI: reward oversold linearly, penalize overbought.
        let rsi_score = match m.rsi {
            Some(rsi) if rsi < 40.0 => {
                acc.reason(format!("RSI oversold at {:.1}", rsi));
                (40.0 - rsi) / 20.0
            }
            Some(rsi) if rsi > 75.0 => {
                acc.reason(format!("RSI overbought at {:.1}", rsi));
                -1.0
            }
            _ => 0.0,
        };
        acc.add("rsi", rsi_score, 1.0);

        // Momentum, graded 0..10%.
        let mom_score = m.momentum.map(|mo| norm(mo, 0.0, 0.1)).unwrap_or(0.0);
        acc.add("momentum", mom_score, 1.5);
        if mom_score > 0.0 {
            acc.reason(format!(
                "Momentum {:+.1}% on the day",
                m.momentum.unwrap_or(0.0) * 100.0
            ));
        }

        // Low float.
        let float_score = match m.float_percent {
            Some(f) if (1.0..=10.0).contains(&f) => 1.0,
            Some(f) if f > 10.0 && f <= 50.0 => 0.5,
            _ => 0.0,
        };
        acc.add("float", float_score, 1.0);
        if float_score > 0.0 {
            acc.reason(format!(
                "Low float at {:.1}% of shares outstanding",
                m.float_percent.unwrap_or(0.0)
            ));
        }

        // Heavy short interest that is slow to cover.
        let short_score = if m.short_percent.map(|s| s >= 15.0).unwrap_or(false)
            && m.fundamentals
                .days_to_cover
                .map(|d| d >= 5.0)
                .unwrap_or(false)
        {
            acc.reason(format!(
                "Short interest {:.1}% with {:.1} days to cover",
                m.short_percent.unwrap_or(0.0),
                m.fundamentals.days_to_cover.unwrap_or(0.0)
            ));
            1.0
        } else {
            0.0
        };
        acc.add("short_interest", short_score, 1.0);

        // Resistance breakout / support bounce on elevated volume.
        let spike_ratio = m.volume_spike_ratio.unwrap_or(0.0);
        let breakout = match m.resistance {
            Some(res) if m.price > res && spike_ratio > 1.5 => {
                acc.reason(format!("Breakout above resistance {:.2}", res));
                1.0
            }
            _ => 0.0,
        };
        acc.add("breakout", breakout, 2.0);

        let bounce = match m.support {
            Some(sup) if m.price > sup && spike_ratio > 1.0 => {
                acc.reason(format!("Holding above support {:.2} on volume", sup));
                1.0
            }
            _ => 0.0,
        };
        acc.add("bounce", bounce, 2.0);

        // EMA 10/50 trend and cross.
        let ema_score = match ema_last_two(&closes, EMA_FAST, EMA_SLOW) {
            Some(((prev_fast, prev_slow), (last_fast, last_slow))) => {
                if last_fast > last_slow && prev_fast <= prev_slow {
                    acc.reason(format!("EMA{} crossed above EMA{}", EMA_FAST, EMA_SLOW));
                    2.0
                } else if last_fast > last_slow {
                    acc.reason(format!("EMA{} above EMA{}", EMA_FAST, EMA_SLOW));
                    1.0
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        acc.add("ema_cross", ema_score, 1.0);

        // MACD histogram turning or staying positive.
        let macd_series = macd(&closes);
        let macd_score = match macd_series.histogram_last_two() {
            Some((prev, last)) => {
                if last > 0.0 && prev <= 0.0 {
                    acc.reason("MACD histogram crossed positive".to_string());
                    2.0
                } else if last > 0.0 {
                    acc.reason("MACD histogram positive".to_string());
                    1.0
                } else {
                    0.0
                }
            }
            None => 0.0,
        };
        acc.add("macd", macd_score, 1.0);

        // Volatility regime: a fresh ATR expansion scores a point, an ATR
        // near its trailing average scores by closeness.
        let atr_series = atr(&highs, &lows, &closes, ATR_PERIOD);
        let atr_score = atr_regime(&atr_series);
        acc.add("atr_regime", atr_score, 1.0);
        if atr_score >= 1.0 {
            acc.reason("ATR expanding above its 30-day average".to_string());
        }

        // Band breakouts.
        let bands = bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_K);
        let boll_score = match bands.last() {
            Some(band) if m.price > band.upper => {
                acc.reason(format!("Price above upper Bollinger band {:.2}", band.upper));
                2.0
            }
            Some(band) if m.price < band.lower => {
                acc.reason(format!("Price below lower Bollinger band {:.2}", band.lower));
                1.0
            }
            _ => 0.0,
        };
        acc.add("bollinger", boll_score, 2.0);

        // Donchian channel over the bars before today, so a fresh 20-day
        // high counts as a breakout.
        let prior = highs.len().saturating_sub(1);
        let channels = donchian(&highs[..prior], &lows[..prior], DONCHIAN_PERIOD);
        let donchian_score = match channels.last() {
            Some(ch) if m.price > ch.upper => {
                acc.reason(format!("New 20-day high above {:.2}", ch.upper));
                2.0
            }
            Some(ch) if m.price < ch.lower => {
                acc.reason(format!("New 20-day low below {:.2}", ch.lower));
                1.0
            }
            _ => 0.0,
        };
        acc.add("donchian", donchian_score, 2.0);

        // Fundamentals: growth combo plus leverage tiers.
        let fundamentals_score = fundamentals_score(m, &mut acc);
        acc.add("fundamentals", fundamentals_score, 1.0);

        // News flow, sentiment, and pre-market action: small capped adders.
        let news_score = m
            .fundamentals
            .news_count
            .map(|n| norm(n as f64, 0.0, 10.0) * 0.5)
            .unwrap_or(0.0);
        acc.add("news", news_score, 1.0);
        if news_score > 0.0 {
            acc.reason(format!(
                "{} recent news articles",
                m.fundamentals.news_count.unwrap_or(0)
            ));
        }

        let sentiment_score = m
            .fundamentals
            .sentiment
            .map(|s| norm(s, 0.0, 1.0) * 0.5)
            .unwrap_or(0.0);
        acc.add("sentiment", sentiment_score, 1.0);
        if sentiment_score > 0.0 {
            acc.reason(format!(
                "Positive sentiment {:.2}",
                m.fundamentals.sentiment.unwrap_or(0.0)
            ));
        }

        let mut premarket_score = m
            .premarket_change
            .map(|c| norm(c, 0.0, 0.05))
            .unwrap_or(0.0);
        if m.premarket_spike {
            premarket_score += 0.5;
        }
        acc.add("premarket", premarket_score, 1.0);
        if premarket_score > 0.0 {
            acc.reason(format!(
                "Pre-market move {:+.1}%",
                m.premarket_change.unwrap_or(0.0) * 100.0
            ));
        }

        let total_score = acc.total;
        ScoreResult {
            total_score,
            reasons: acc.reasons,
            is_top_pick: total_score >= self.top_pick_threshold,
            components: acc.components,
        }
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

/// Last two defined (fast, slow) EMA pairs, oldest first.
fn ema_last_two(
    closes: &[f64],
    fast: usize,
    slow: usize,
) -> Option<((f64, f64), (f64, f64))> {
    if closes.len() < slow + 1 {
        return None;
    }
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);
    let n = closes.len();
    let prev = (fast_ema[n - 2]?, slow_ema[n - 2]?);
    let last = (fast_ema[n - 1]?, slow_ema[n - 1]?);
    Some((prev, last))
}

/// Volatility regime score: +1 when the latest ATR exceeds 1.5x its
/// trailing 30-value average, otherwise graded by closeness to that
/// average (exactly average scores 1, half away scores 0).
fn atr_regime(atr_series: &[f64]) -> f64 {
    if atr_series.is_empty() {
        return 0.0;
    }
    let window = &atr_series[atr_series.len().saturating_sub(ATR_REGIME_WINDOW)..];
    let avg = window.iter().sum::<f64>() / window.len() as f64;
    if avg == 0.0 {
        return 0.0;
    }
    let latest = atr_series[atr_series.len() - 1];
    let ratio = latest / avg;
    if ratio > 1.5 {
        1.0
    } else {
        1.0 - norm((ratio - 1.0).abs(), 0.0, 0.5)
    }
}

/// Growth + EPS combo scores 0..2; debt/equity tiers score -1..+2.
fn fundamentals_score(m: &TickerMetrics, acc: &mut Accumulator) -> f64 {
    let mut score = 0.0;

    let growth = m.fundamentals.revenue_growth.unwrap_or(0.0);
    let eps = m.fundamentals.eps_growth.unwrap_or(0.0);
    if growth > 0.2 && eps > 0.2 {
        score += 2.0;
        acc.reason(format!(
            "Revenue growth {:.0}% and EPS growth {:.0}%",
            growth * 100.0,
            eps * 100.0
        ));
    } else if growth > 0.2 || eps > 0.2 {
        score += 1.0;
        acc.reason("Strong growth in revenue or EPS".to_string());
    }

    if let Some(de) = m.fundamentals.debt_to_equity {
        if de < 0.5 {
            score += 2.0;
            acc.reason(format!("Low debt/equity {:.2}", de));
        } else if de < 1.0 {
            score += 1.0;
            acc.reason(format!("Moderate debt/equity {:.2}", de));
        } else if de >= 2.0 {
            score -= 1.0;
            acc.reason(format!("High debt/equity {:.2}", de));
        }
    }

    score
}

/// Collects weighted contributions and ordered reasons.
#[derive(Default)]
struct Accumulator {
    total: f64,
    reasons: Vec<String>,
    components: BTreeMap<String, f64>,
}

impl Accumulator {
    /// Record `value * weight` under `name` and add it to the total.
    fn add(&mut self, name: &str, value: f64, weight: f64) {
        let contribution = value * weight;
        self.components.insert(name.to_string(), contribution);
        self.total += contribution;
    }

    fn reason(&mut self, text: String) {
        self.reasons.push(text);
    }
}
