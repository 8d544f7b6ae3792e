use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fetch,
    Parse,
    Persist,
}

impl Phase {
    const ALL: [Phase; 3] = [Phase::Fetch, Phase::Parse, Phase::Persist];

    fn name(self) -> &'static str {
        match self {
            Phase::Fetch => "fetch",
            Phase::Parse => "parse",
            Phase::Persist => "persist",
        }
    }
}

/// Wall-clock time per pipeline phase and per descriptor.
#[derive(Debug, Default)]
pub struct Profile {
    phases: [Duration; 3],
    descriptors: Vec<(String, Duration)>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time<T>(&mut self, phase: Phase, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.phases[phase as usize] += start.elapsed();
        out
    }

    pub fn record_descriptor(&mut self, label: String, elapsed: Duration) {
        self.descriptors.push((label, elapsed));
    }

    pub fn phase_total(&self, phase: Phase) -> Duration {
        self.phases[phase as usize]
    }

    pub fn print(&self) {
        println!("\nProfile");
        println!("{:<10} | {:>10}", "phase", "seconds");
        println!("{}", "-".repeat(23));
        for phase in Phase::ALL {
            println!("{:<10} | {:>10.3}", phase.name(), self.phase_total(phase).as_secs_f64());
        }

        let mut slowest: Vec<&(String, Duration)> = self.descriptors.iter().collect();
        slowest.sort_by(|a, b| b.1.cmp(&a.1));
        if !slowest.is_empty() {
            println!("\nSlowest shows");
            for (label, elapsed) in slowest.into_iter().take(10) {
                println!("{:>8.3}s  {}", elapsed.as_secs_f64(), label);
            }
        }
    }
}
