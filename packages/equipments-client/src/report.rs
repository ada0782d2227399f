//! Aggregated pass/fail report.

use std::fmt::Write;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::config::ClientConfig;

/// One labelled check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub label: String,
    pub passed: bool,
}

impl StepResult {
    pub fn new(label: impl Into<String>, passed: bool) -> Self {
        Self {
            label: label.into(),
            passed,
        }
    }
}

/// Ordered check results of a run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub results: Vec<StepResult>,
    pub duration: Duration,
    pub finished_at: DateTime<Local>,
}

impl RunReport {
    pub fn new(results: Vec<StepResult>, duration: Duration) -> Self {
        Self {
            results,
            duration,
            finished_at: Local::now(),
        }
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// `round(100 * passed / total)`, halves rounded up. 0 for an empty report.
    pub fn success_rate(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        let rate = (200 * self.passed() + total) / (2 * total);
        u32::try_from(rate).unwrap_or(100)
    }

    /// Whether the success rate reaches `threshold_percent`.
    pub fn is_functional(&self, threshold_percent: u32) -> bool {
        self.success_rate() >= threshold_percent
    }

    /// Renders the summary, verdict and follow-up instructions.
    pub fn render(&self, config: &ClientConfig) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(out, "\n{}", rule);
        let _ = writeln!(out, "📊 RÉSUMÉ FINAL");
        let _ = writeln!(out, "{}", rule);
        for result in &self.results {
            let status = if result.passed { "✅" } else { "❌" };
            let _ = writeln!(out, "{} {}", status, result.label);
        }

        let _ = writeln!(
            out,
            "\nScore: {}% ({}/{})",
            self.success_rate(),
            self.passed(),
            self.total()
        );
        let _ = writeln!(out, "Durée: {:.2}s", self.duration.as_secs_f64());

        if self.is_functional(config.success_threshold_percent) {
            let _ = writeln!(out, "\n🎉 SYSTÈME D'ÉQUIPEMENTS FONCTIONNEL");
            let _ = writeln!(out, "✅ Base de données accessible");
            let _ = writeln!(out, "✅ CRUD opérationnel");
            let _ = writeln!(out, "✅ Équipements initiaux disponibles");
            let _ = writeln!(out, "✅ Prêt pour l'interface utilisateur");

            let _ = writeln!(out, "\n🎯 INSTRUCTIONS FINALES:");
            let _ = writeln!(out, "1. 🌐 Accéder à {}", config.app_url);
            let _ = writeln!(out, "2. 🔧 Cliquer sur 'Paramètres' dans la sidebar");
            let _ = writeln!(out, "3. 🛠️ Sélectionner l'onglet 'Équipements'");
            let _ = writeln!(out, "4. 📊 Vérifier que les équipements s'affichent");
            let _ = writeln!(out, "5. ➕ Tester 'Ajouter un équipement'");
            let _ = writeln!(out, "6. ✏️ Tester modification/suppression");
        } else {
            let _ = writeln!(out, "\n⚠️ PROBLÈMES DÉTECTÉS");
            let _ = writeln!(out, "🔍 Vérifier la configuration Supabase");
            let _ = writeln!(out, "🔒 Problème possible avec RLS policies");
            let _ = writeln!(out, "🌐 Vérifier la connectivité réseau");
        }

        let _ = writeln!(out, "\n{}", rule);
        let _ = writeln!(
            out,
            "🏁 Test terminé - {}",
            self.finished_at.format("%Y-%m-%d %H:%M:%S")
        );
        let _ = write!(out, "{}", rule);
        out
    }
}
