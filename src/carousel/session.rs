use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use super::controller::{CarouselController, CarouselSettings, CarouselState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselCommand {
    Next,
    Previous,
    GoTo(usize),
    Hover(bool),
    /// The item list changed identity; carries the new length.
    ReplaceItems(usize),
}

/// A mounted carousel: a task that owns a [`CarouselController`] and its
/// autoplay and resume timers.
pub struct CarouselSession;

impl CarouselSession {
    pub fn spawn(len: usize, settings: CarouselSettings) -> CarouselHandle {
        let controller = CarouselController::new(len, settings);
        let (frames_tx, frames_rx) = watch::channel(controller.state());
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run_session(controller, commands_rx, frames_tx));

        CarouselHandle {
            commands: commands_tx,
            frames: frames_rx,
            task,
        }
    }
}

/// Owner side of a session. Dropping it unmounts the carousel: the task is
/// aborted along with any pending timer.
pub struct CarouselHandle {
    commands: mpsc::UnboundedSender<CarouselCommand>,
    frames: watch::Receiver<CarouselState>,
    task: JoinHandle<()>,
}

impl CarouselHandle {
    pub fn send(&self, command: CarouselCommand) {
        // Only fails once the task is gone, at which point nobody is watching.
        let _ = self.commands.send(command);
    }

    pub fn state(&self) -> CarouselState {
        *self.frames.borrow()
    }

    /// Receiver that wakes on every state change.
    pub fn subscribe(&self) -> watch::Receiver<CarouselState> {
        self.frames.clone()
    }

    pub fn shutdown(self) {
        drop(self);
    }
}

impl Drop for CarouselHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_session(
    mut controller: CarouselController,
    mut commands: mpsc::UnboundedReceiver<CarouselCommand>,
    frames: watch::Sender<CarouselState>,
) {
    let mut autoplay_at = next_tick(&controller);
    let mut resume_at: Option<Instant> = None;

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                debug!("Carousel command: {:?}", command);

                let user_action = match command {
                    CarouselCommand::Next => controller.next(),
                    CarouselCommand::Previous => controller.previous(),
                    CarouselCommand::GoTo(index) => controller.go_to(index),
                    CarouselCommand::Hover(hovered) => {
                        controller.set_hover(hovered);
                        false
                    }
                    CarouselCommand::ReplaceItems(len) => {
                        controller.replace_items(len);
                        resume_at = None;
                        false
                    }
                };

                if user_action {
                    resume_at = controller
                        .settings()
                        .resume_after
                        .map(|cooldown| Instant::now() + cooldown);
                }
                autoplay_at = next_tick(&controller);
            }
            _ = wait_for(autoplay_at) => {
                controller.tick();
                autoplay_at = next_tick(&controller);
            }
            _ = wait_for(resume_at) => {
                controller.resume_autoplay();
                resume_at = None;
                autoplay_at = next_tick(&controller);
            }
        }

        let state = controller.state();
        frames.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
    }

    debug!("Carousel session ended");
}

fn next_tick(controller: &CarouselController) -> Option<Instant> {
    controller
        .autoplay_armed()
        .then(|| Instant::now() + controller.settings().autoplay_interval)
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
