//! Progress reporting for analysis runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sideview_application::AnalysisProgressNotifier;
use sideview_domain::{AnalysisRun, PersonaId};
use std::sync::Mutex;

/// Reports progress with a single bar advancing once per persona
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisProgressNotifier for ProgressReporter {
    fn on_analysis_start(&self, total_personas: usize) {
        let bar = ProgressBar::new(total_personas as u64);
        bar.set_style(Self::style());
        bar.set_prefix("Reviewing");
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_persona_start(&self, persona: PersonaId) {
        self.with_bar(|bar| bar.set_message(format!("{}...", persona.display_name())));
    }

    fn on_persona_complete(&self, persona: PersonaId, success: bool) {
        self.with_bar(|bar| {
            let line = if success {
                format!("{} {}", "v".green(), persona.display_name())
            } else {
                format!("{} {} (failed)", "x".red(), persona.display_name())
            };
            bar.println(line);
            bar.inc(1);
        });
    }

    fn on_analysis_complete(&self, run: &AnalysisRun) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        if let Some(bar) = guard.take() {
            let message = format!("{}/{} succeeded", run.success_count(), run.total_count());
            if run.success_count() > 0 {
                bar.finish_with_message(message.green().to_string());
            } else {
                bar.abandon_with_message(message.red().to_string());
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl AnalysisProgressNotifier for SimpleProgress {
    fn on_analysis_start(&self, total_personas: usize) {
        println!(
            "{} {} ({} personas)",
            "->".cyan(),
            "Reviewing document".bold(),
            total_personas
        );
    }

    fn on_persona_start(&self, _persona: PersonaId) {}

    fn on_persona_complete(&self, persona: PersonaId, success: bool) {
        if success {
            println!("  {} {}", "v".green(), persona.display_name());
        } else {
            println!("  {} {} (failed)", "x".red(), persona.display_name());
        }
    }

    fn on_analysis_complete(&self, _run: &AnalysisRun) {
        println!();
    }
}
