//! Interface de terminal do Gardener — spinners e saída colorida.
//!
//! Usa as crates `indicatif` para spinners de progresso e `console` para
//! estilização com cores. O [`JobProgress`] acompanha visualmente
//! o processamento de um arquivo no terminal.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::state_machine::{JobRecord, JobState};

/// Indicador visual de progresso para o processamento de um arquivo.
///
/// Exibe um spinner animado durante o processamento e mensagens
/// coloridas para sucesso (verde), falha (vermelho) e triagem (amarelo).
pub struct JobProgress {
    // Barra de progresso/spinner do indicatif.
    pb: ProgressBar,
    // Estilo verde para mensagens de sucesso.
    green: Style,
    // Estilo vermelho para mensagens de falha.
    red: Style,
    // Estilo amarelo para avisos e triagem forçada.
    yellow: Style,
}

impl JobProgress {
    /// Inicia o spinner com o nome do arquivo e retorna a instância de progresso.
    pub fn start(display_name: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("PENDING: {display_name}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Atualiza a mensagem do spinner para refletir o estado atual do job.
    pub fn update_state(&self, state: JobState) {
        self.pb.set_message(format!("{state}"));
    }

    /// Exibe um aviso amarelo sem interromper o spinner.
    pub fn warn(&self, message: &str) {
        self.pb
            .println(format!("  {} {message}", self.yellow.apply_to("!")));
    }

    /// Finaliza o spinner e exibe a linha de resultado do arquivo.
    ///
    /// Sucesso é mostrado em verde com o destino final; falha em vermelho
    /// com o motivo.
    pub fn complete(&self, record: &JobRecord) {
        self.pb.finish_and_clear();
        match record.state {
            JobState::Placed => {
                let destination = record.destination.as_deref().unwrap_or("?");
                println!(
                    "  {} {} -> {destination}",
                    self.green.apply_to("✓"),
                    record.display_name
                );
            }
            _ => {
                let reason = record.failure_reason.as_deref().unwrap_or("unknown");
                println!(
                    "  {} {} failed: {reason}",
                    self.red.apply_to("✗"),
                    record.display_name
                );
            }
        }
    }
}

/// Imprime o resumo final da execução do pipeline.
pub fn print_summary(placed: usize, failed: usize, forced_triage: usize) {
    let green = Style::new().green().bold();
    let red = Style::new().red().bold();
    let yellow = Style::new().yellow();
    println!();
    println!(
        "{} placed, {} failed, {} forced to triage",
        green.apply_to(placed),
        red.apply_to(failed),
        yellow.apply_to(forced_triage)
    );
}
