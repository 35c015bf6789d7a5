//! Interface de terminal do tweetsmith: spinners e saída colorida.
//!
//! Usa as crates `indicatif` para spinners de progresso e `console` para
//! estilização com cores. O [`TerminalPresenter`] implementa o
//! [`Presenter`](crate::controller::Presenter) do controlador.

use std::sync::Mutex;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::controller::{Action, Presenter};

/// Apresentador de terminal.
///
/// Mostra um spinner enquanto uma ação está em andamento, o tweet atual
/// em verde, hashtags em ciano e avisos em amarelo. Mantém no máximo um
/// aviso: um novo aviso substitui o anterior.
pub struct TerminalPresenter {
    // Spinners ativos, um por ação em andamento.
    spinners: Mutex<Vec<(Action, ProgressBar)>>,
    // Aviso exibido atualmente, se houver.
    notice: Mutex<Option<String>>,
    green: Style,
    cyan: Style,
    yellow: Style,
    dim: Style,
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self {
            spinners: Mutex::new(Vec::new()),
            notice: Mutex::new(None),
            green: Style::new().green().bold(),
            cyan: Style::new().cyan(),
            yellow: Style::new().yellow().bold(),
            dim: Style::new().dim(),
        }
    }

    fn spinner(label: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(label.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

impl Presenter for TerminalPresenter {
    fn set_busy(&self, action: Action, busy: bool) {
        let Ok(mut spinners) = self.spinners.lock() else {
            return;
        };
        if busy {
            spinners.push((action, Self::spinner(action.busy_label())));
        } else if let Some(pos) = spinners.iter().position(|(a, _)| *a == action) {
            let (_, pb) = spinners.remove(pos);
            pb.finish_and_clear();
        }
    }

    fn show_result(&self, text: &str, visible: bool) {
        if !visible {
            println!("  {}", self.dim.apply_to("(output cleared)"));
            return;
        }
        println!();
        println!("{}", self.green.apply_to("─── Tweet ───"));
        println!("{text}");
        println!();
    }

    fn show_hashtags(&self, hashtags: &str) {
        println!("  {} {}", self.cyan.apply_to("hashtags:"), hashtags);
    }

    fn show_notice(&self, message: &str) {
        if let Ok(mut notice) = self.notice.lock() {
            *notice = Some(message.to_string());
        }
        eprintln!("  {} {message}", self.yellow.apply_to("!"));
    }

    fn dismiss_notice(&self) {
        if let Ok(mut notice) = self.notice.lock() {
            *notice = None;
        }
    }
}
