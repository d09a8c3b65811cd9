/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 训练轮次的计时与损失统计
 */

use std::time::{Duration, Instant};

/// 一个训练轮次的计时与损失累计
#[derive(Debug, Clone)]
pub struct TimeStat {
    start: Instant,
    loss_sum: f64,
    count: usize,
}

impl Default for TimeStat {
    fn default() -> Self {
        Self::start()
    }
}

impl TimeStat {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            loss_sum: 0.0,
            count: 0,
        }
    }

    pub fn add_loss(&mut self, loss: f32) {
        self.loss_sum += f64::from(loss);
        self.count += 1;
    }

    pub fn loss_sum(&self) -> f64 {
        self.loss_sum
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
