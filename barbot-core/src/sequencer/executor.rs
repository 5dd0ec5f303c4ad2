//! Program executor
//!
//! The [`Sequencer`] owns the program, the run state, the carriage and the
//! device registry. Callers edit the program and start it; a host loop then
//! calls [`Sequencer::tick`] as often as it can. Every mutation goes through
//! `&mut self`, so the tick and the program API can never interleave.
//!
//! Tick order:
//! 1. Advance carriage stepping and poll every device
//! 2. Sample the safety inputs
//! 3. Emergency stop, then limit switch (may fault from any state)
//! 4. Container gate (start a waiting program, or abort a running one)
//! 5. Completion of the current instruction, then dispatch of the next

use crate::config::MachineConfig;
use crate::error::Rejected;
use crate::motion::{LimitEvent, MotionSupervisor};
use crate::program::{Instruction, Opcode, Program};
use crate::registry::DeviceRegistry;
use crate::safety::{InputSnapshot, PresenceAction, SafetyMonitor, SafetyStatus};
use crate::state::{Event, FaultKind, RunState};
use crate::traits::{elapsed_ms, Actuator, Clock, Device, DeviceStatus, SafetyInputs};

/// Timestamp shared by everything done within one call
#[derive(Debug, Clone, Copy)]
struct Now {
    us: u64,
    ms: u32,
}

/// Outcome of dispatching an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    Started,
    /// Past the last instruction
    End,
    /// The instruction could not start and the machine faulted
    Faulted(Event),
}

/// Completion of the current instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Pending,
    Done,
    Failed(FaultKind),
}

/// Instruction sequencer
///
/// Generic over its collaborators so the same logic drives real hardware
/// and host-side simulations.
#[derive(Debug)]
pub struct Sequencer<A, D, I, C> {
    state: RunState,
    program: Program,
    /// Index of the current instruction; equals the program length once
    /// the last instruction has completed
    cursor: usize,
    wait_start_ms: u32,
    motion: MotionSupervisor<A>,
    registry: DeviceRegistry<D>,
    safety: SafetyMonitor,
    inputs: I,
    clock: C,
}

impl<A, D, I, C> Sequencer<A, D, I, C>
where
    A: Actuator,
    D: Device,
    I: SafetyInputs,
    C: Clock,
{
    /// Assemble the sequencer
    ///
    /// The carriage is parked de-energized and the machine starts idle with
    /// an empty program.
    pub fn new(
        config: &MachineConfig,
        actuator: A,
        registry: DeviceRegistry<D>,
        inputs: I,
        clock: C,
    ) -> Self {
        Self {
            state: RunState::Idle,
            program: Program::new(),
            cursor: 0,
            wait_start_ms: 0,
            motion: MotionSupervisor::new(actuator, config.motion),
            registry,
            safety: SafetyMonitor::new(config.safety),
            inputs,
            clock,
        }
    }

    // Program API

    /// Append an instruction
    ///
    /// Refused while running, for a DISPENSE naming an id outside the
    /// device table, or when the program is full. A refusal leaves the
    /// program untouched.
    pub fn add(&mut self, opcode: Opcode, param1: u16, param2: u16) -> Result<(), Rejected> {
        self.push(Instruction::new(opcode, param1, param2))
    }

    /// Append a prebuilt instruction; same rules as [`Sequencer::add`]
    pub fn push(&mut self, instruction: Instruction) -> Result<(), Rejected> {
        if !self.state.accepts_edits() {
            debug!("add refused: running");
            return Err(Rejected::Running);
        }

        if instruction.opcode == Opcode::Dispense
            && !DeviceRegistry::<D>::is_valid_id(instruction.param1)
        {
            debug!("add refused: no device {}", instruction.param1);
            return Err(Rejected::InvalidDevice);
        }

        self.program
            .push(instruction)
            .map_err(|_| Rejected::ProgramFull)
    }

    /// Empty the program
    pub fn clear(&mut self) -> Result<(), Rejected> {
        if !self.state.accepts_edits() {
            debug!("clear refused: running");
            return Err(Rejected::Running);
        }

        self.program.clear();
        self.cursor = 0;
        Ok(())
    }

    /// Start the program
    ///
    /// With a container present the first instruction is dispatched at once
    /// and the machine is running; otherwise it waits for one. A first MOVE
    /// or ZERO refused under the emergency stop leaves the machine faulted.
    pub fn go(&mut self) -> Result<(), Rejected> {
        if self.state != RunState::Idle {
            debug!("go refused: not idle");
            return Err(Rejected::NotIdle);
        }

        if self.program.is_empty() {
            debug!("go refused: no instructions");
            return Err(Rejected::EmptyProgram);
        }

        let now = self.now();
        self.cursor = 0;

        if self.safety.container_present(&self.inputs) {
            if let Dispatch::Faulted(_) = self.exec(self.cursor, now) {
                return Ok(());
            }
            self.apply(Event::Start);
        } else {
            info!("waiting for container");
            self.apply(Event::AwaitContainer);
        }

        Ok(())
    }

    /// Halt everything and return to idle with an empty program
    ///
    /// The halt and the program clear always happen. `Err` reports that
    /// the emergency stop is still asserted and the machine stayed faulted.
    pub fn reset(&mut self) -> Result<(), Rejected> {
        self.enter_fault(FaultKind::Requested);
        self.program.clear();
        self.cursor = 0;

        let emergency_stop = self.inputs.emergency_stop();
        self.apply(Event::Reset { emergency_stop });

        if self.state.is_fault() {
            warn!("reset vetoed: emergency stop active");
            return Err(Rejected::EmergencyStopActive);
        }

        info!("reset");
        Ok(())
    }

    /// Force the machine into FAULT
    pub fn fault(&mut self) {
        self.enter_fault(FaultKind::Requested);
    }

    // Control tick

    /// Run one control cycle
    ///
    /// Never blocks. Call at a high, steady rate.
    ///
    /// # Returns
    /// The state machine event applied during this tick, if any
    pub fn tick(&mut self) -> Option<Event> {
        let now = self.now();

        self.motion.run(now.us);
        self.registry.poll_all(now.ms);
        self.motion.run(now.us);

        let inputs = self.safety.sample(&self.inputs);
        let mut raised = None;

        if let SafetyStatus::Fault(kind) = self.safety.check(self.state) {
            raised = Some(self.enter_fault(kind));
        }

        let limit = self.motion.check_limit(inputs.limit_switch, now.ms);
        if limit == LimitEvent::Unexpected && !self.state.is_fault() {
            warn!("limit switch unexpectedly hit");
            raised = Some(self.enter_fault(FaultKind::LimitSwitch));
        }

        self.motion.run(now.us);

        match self.safety.presence(self.state) {
            PresenceAction::Begin => {
                if let Dispatch::Faulted(event) = self.exec(self.cursor, now) {
                    return Some(event);
                }
                return Some(self.apply(Event::ContainerArrived));
            }
            PresenceAction::Abort => {
                warn!("container removed");
                return Some(self.enter_fault(FaultKind::ContainerRemoved));
            }
            PresenceAction::Hold => {}
        }

        if !self.state.is_running() {
            return raised;
        }

        let progress = self.progress(&inputs, now.ms);
        self.motion.run(now.us);

        match progress {
            Progress::Pending => raised,
            Progress::Failed(kind) => Some(self.enter_fault(kind)),
            Progress::Done => self.advance(now),
        }
    }

    // Accessors

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Index of the current instruction
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// The instruction being executed, if any
    pub fn current(&self) -> Option<&Instruction> {
        self.program.get(self.cursor)
    }

    pub fn motion(&self) -> &MotionSupervisor<A> {
        &self.motion
    }

    pub fn registry(&self) -> &DeviceRegistry<D> {
        &self.registry
    }

    /// Input levels seen by the last tick
    pub fn inputs(&self) -> InputSnapshot {
        self.safety.last()
    }

    // Internals

    fn now(&self) -> Now {
        Now {
            us: self.clock.now_us(),
            ms: self.clock.now_ms(),
        }
    }

    /// Apply an event to the state machine
    fn apply(&mut self, event: Event) -> Event {
        let next = self.state.transition(event);
        if next != self.state {
            debug!("state {} -> {}", self.state, next);
        }
        self.state = next;
        event
    }

    /// Enter FAULT, stopping the carriage and every device right away
    ///
    /// Safe to repeat; the first fault kind is kept.
    fn enter_fault(&mut self, kind: FaultKind) -> Event {
        if !self.state.is_fault() {
            error!("FAULT: {}", kind);
        }
        self.motion.halt();
        self.registry.stop_all();
        self.apply(Event::FaultRaised(kind))
    }

    /// Dispatch the instruction at `index`
    ///
    /// A MOVE or ZERO refused under the emergency stop faults the machine
    /// with the cursor left on it.
    fn exec(&mut self, index: usize, now: Now) -> Dispatch {
        let Some(&ins) = self.program.get(index) else {
            return Dispatch::End;
        };

        debug!(
            "exec ins[{}] {} p1={} p2={}",
            index, ins.opcode, ins.param1, ins.param2
        );

        match ins.opcode {
            Opcode::Nop => {}
            Opcode::Move => {
                let emergency_stop = self.inputs.emergency_stop();
                let moved = self
                    .motion
                    .travel(i32::from(ins.param1), emergency_stop, now.ms);
                if moved.is_err() {
                    return Dispatch::Faulted(self.enter_fault(FaultKind::EmergencyStop));
                }
                self.motion.run(now.us);
            }
            Opcode::Dispense => {
                if !self.registry.start(ins.param1, ins.param2, now.ms) {
                    debug!("device {} absent, skipped", ins.param1);
                }
            }
            Opcode::Wait => {
                self.wait_start_ms = now.ms;
            }
            Opcode::Zero => {
                let emergency_stop = self.inputs.emergency_stop();
                if self.motion.home(emergency_stop, now.ms).is_err() {
                    return Dispatch::Faulted(self.enter_fault(FaultKind::EmergencyStop));
                }
                self.motion.run(now.us);
            }
        }

        Dispatch::Started
    }

    /// Evaluate completion of the current instruction
    fn progress(&mut self, inputs: &InputSnapshot, now_ms: u32) -> Progress {
        // Only reachable if the program was cleared while waiting
        let Some(&ins) = self.program.get(self.cursor) else {
            return Progress::Done;
        };

        match ins.opcode {
            Opcode::Nop => Progress::Done,
            Opcode::Move => {
                if self.motion.distance_to_go() == 0 {
                    Progress::Done
                } else if self.motion.move_timed_out(now_ms) {
                    Progress::Failed(FaultKind::MoveTimeout)
                } else {
                    Progress::Pending
                }
            }
            Opcode::Dispense => match self.registry.status(ins.param1) {
                Some(DeviceStatus::Busy) => Progress::Pending,
                Some(DeviceStatus::Idle) | None => Progress::Done,
            },
            Opcode::Wait => {
                if elapsed_ms(now_ms, self.wait_start_ms) >= u32::from(ins.param1) {
                    Progress::Done
                } else {
                    Progress::Pending
                }
            }
            Opcode::Zero => {
                if inputs.limit_switch {
                    self.motion.pin_home();
                    Progress::Done
                } else if self.motion.distance_to_go() == 0 {
                    Progress::Failed(FaultKind::HomingOvershoot)
                } else if self.motion.move_timed_out(now_ms) {
                    Progress::Failed(FaultKind::HomingTimeout)
                } else {
                    Progress::Pending
                }
            }
        }
    }

    /// Move past a completed instruction and dispatch the next
    fn advance(&mut self, now: Now) -> Option<Event> {
        if self.cursor < self.program.len() {
            self.cursor += 1;
        }

        match self.exec(self.cursor, now) {
            Dispatch::Started => return None,
            Dispatch::Faulted(event) => return Some(event),
            Dispatch::End => {}
        }

        info!("program complete");
        self.motion.disable_outputs();
        Some(self.apply(Event::ProgramFinished))
    }
}
