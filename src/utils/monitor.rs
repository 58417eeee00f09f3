use std::time::Duration;
#[cfg(feature = "cli")]
use std::time::Instant;
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

/// Poll-loop latency bookkeeping, available with or without `sysinfo`.
#[derive(Debug, Clone, Default)]
pub struct LoopStats {
    pub ticks: u64,
    pub overruns: u64,
    pub max_tick: Duration,
    total: Duration,
}

impl LoopStats {
    /// Records one tick's work time against the configured poll period.
    pub fn record(&mut self, work: Duration, period: Duration) {
        self.ticks += 1;
        self.total += work;
        if work > self.max_tick {
            self.max_tick = work;
        }
        if work > period {
            self.overruns += 1;
        }
    }

    pub fn mean_tick(&self) -> Duration {
        if self.ticks == 0 {
            return Duration::ZERO;
        }
        self.total / self.ticks as u32
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ProcessStats {
    pub cpu_usage: f32,
    pub memory_usage_mb: u64,
    pub elapsed_time: Duration,
}

#[cfg(feature = "cli")]
pub struct SystemMonitor {
    system: Option<(System, Pid)>,
    start_time: Instant,
    loop_stats: LoopStats,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let system = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => {
                    let mut system = System::new_with_specifics(RefreshKind::everything());
                    system.refresh_all();
                    Some((system, pid))
                }
                Err(e) => {
                    tracing::warn!("Process stats unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            system,
            start_time: Instant::now(),
            loop_stats: LoopStats::default(),
            enabled,
        }
    }

    pub fn record_tick(&mut self, work: Duration, period: Duration) {
        if self.enabled {
            self.loop_stats.record(work, period);
        }
    }

    pub fn loop_stats(&self) -> &LoopStats {
        &self.loop_stats
    }

    pub fn process_stats(&mut self) -> Option<ProcessStats> {
        let (system, pid) = self.system.as_mut()?;
        system.refresh_all();
        let process = system.process(*pid)?;

        Some(ProcessStats {
            cpu_usage: process.cpu_usage(),
            memory_usage_mb: process.memory() / 1024 / 1024,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn log_stats(&mut self, phase: &str) {
        if !self.enabled {
            return;
        }
        if let Some(stats) = self.process_stats() {
            tracing::info!(
                "{} - CPU: {:.1}%, Memory: {}MB, Time: {:?}",
                phase,
                stats.cpu_usage,
                stats.memory_usage_mb,
                stats.elapsed_time
            );
        }
        let loop_stats = &self.loop_stats;
        if loop_stats.ticks > 0 {
            tracing::info!(
                "{} - Poll loop: {} ticks, mean {:?}, max {:?}, {} overruns",
                phase,
                loop_stats.ticks,
                loop_stats.mean_tick(),
                loop_stats.max_tick,
                loop_stats.overruns
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// Without the cli feature only loop stats are kept.
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor {
    loop_stats: LoopStats,
    enabled: bool,
}

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            loop_stats: LoopStats::default(),
            enabled,
        }
    }

    pub fn record_tick(&mut self, work: Duration, period: Duration) {
        if self.enabled {
            self.loop_stats.record(work, period);
        }
    }

    pub fn loop_stats(&self) -> &LoopStats {
        &self.loop_stats
    }

    pub fn log_stats(&mut self, _phase: &str) {}

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
