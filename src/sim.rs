use std::{
    sync::mpsc,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use rand::{rngs::StdRng, Rng};
use tracing::{debug, error, info};

use crate::{Engine, State};

/// Decides when the next generation is due.
pub trait Ticker: Send + 'static {
    fn tick(&mut self) -> bool;

    /// multiplies the tick period, values below 1 speed things up.
    fn rescale(&mut self, _factor: f64) {}
}

#[derive(Debug)]
pub struct IntervalTicker {
    interval: Duration,
    last: Instant,
}

impl IntervalTicker {
    const MIN_INTERVAL: Duration = Duration::from_millis(1);
    const MAX_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new(interval: Duration) -> Self {
        let interval = interval.clamp(Self::MIN_INTERVAL, Self::MAX_INTERVAL);
        Self {
            interval,
            last: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Ticker for IntervalTicker {
    fn tick(&mut self) -> bool {
        if self.last.elapsed() >= self.interval {
            self.last = Instant::now();
            true
        } else {
            false
        }
    }

    fn rescale(&mut self, factor: f64) {
        self.interval = self
            .interval
            .mul_f64(factor)
            .clamp(Self::MIN_INTERVAL, Self::MAX_INTERVAL);
        debug!("tick interval is now {:?}", self.interval());
    }
}

pub enum SimCmd {
    Snapshot(mpsc::Sender<State>),
    Restart,
    Faster,
    Slower,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

const SPEED_FACTOR: f64 = 1.5;

/// Owns the engine and steps it on its ticker until the generation bound is reached.
#[derive(Debug)]
pub struct Driver<T, R = StdRng> {
    engine: Engine<R>,
    ticker: T,
    stop_after: Option<u64>,
}

impl<T, R> Driver<T, R>
where
    T: Ticker,
    R: Rng,
{
    pub fn new(engine: Engine<R>, ticker: T, stop_after: Option<u64>) -> Self {
        Self {
            engine,
            ticker,
            stop_after,
        }
    }

    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    pub fn is_finished(&self) -> bool {
        let generation = self.engine().state().generation();
        self.stop_after.map_or(false, |limit| generation >= limit)
    }

    /// steps once if the ticker is due, returns whether a generation was produced.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() || !self.ticker.tick() {
            return false;
        }
        self.engine.step();
        if self.is_finished() {
            info!("stopped after {} generations", self.engine.state().generation());
        }
        true
    }

    pub fn handle(&mut self, cmd: SimCmd) -> Flow {
        match cmd {
            SimCmd::Snapshot(sender) => {
                if sender.send(self.engine.snapshot()).is_err() {
                    debug!("snapshot requester went away");
                }
            }
            SimCmd::Restart => self.engine.restart(),
            SimCmd::Faster => self.ticker.rescale(1.0 / SPEED_FACTOR),
            SimCmd::Slower => self.ticker.rescale(SPEED_FACTOR),
            SimCmd::Stop => return Flow::Stop,
        }
        Flow::Continue
    }
}

pub struct SimHandle {
    sender: mpsc::Sender<SimCmd>,
}

impl SimHandle {
    pub fn new(sender: mpsc::Sender<SimCmd>) -> Self {
        Self { sender }
    }

    /// `None` once the simulation is gone.
    pub fn snapshot(&self) -> Option<State> {
        let (sender, receiver) = mpsc::channel();
        self.sender.send(SimCmd::Snapshot(sender)).ok()?;
        receiver.recv().ok()
    }

    pub fn send(&self, cmd: SimCmd) -> bool {
        self.sender.send(cmd).is_ok()
    }
}

#[derive(Debug)]
pub struct Sim {
    thread: JoinHandle<()>,
    sender: mpsc::Sender<SimCmd>,
}

impl Sim {
    pub fn spawn<T, R>(driver: Driver<T, R>) -> Self
    where
        T: Ticker,
        R: Rng + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let thread = thread::spawn(move || sim_loop(receiver, driver));
        Self { thread, sender }
    }

    pub fn handle(&self) -> SimHandle {
        SimHandle::new(self.sender.clone())
    }

    pub fn join(self) {
        drop(self.sender);
        if self.thread.join().is_err() {
            error!("simulation thread panicked");
        }
    }
}

const EVT_CHECK_TIMEOUT: Duration = Duration::from_millis(1);

fn sim_loop<T, R>(receiver: mpsc::Receiver<SimCmd>, mut driver: Driver<T, R>)
where
    T: Ticker,
    R: Rng,
{
    loop {
        loop {
            match receiver.try_recv() {
                Ok(cmd) => {
                    if driver.handle(cmd) == Flow::Stop {
                        return;
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        driver.advance();
        thread::sleep(EVT_CHECK_TIMEOUT);
    }
}
