// Program-change subsystem
//
// Resolves the target program from CV or the program knob, tracks the
// factory/user bank flag across its three writers (CV threshold, bank
// button, inbound bank-select pair), and fires Program Change messages on
// an edge-triggered send control.

use crate::bridge::Bridge;
use crate::bridge::trigger::{RisingEdge, SchmittTrigger};
use crate::surface::{Surface, jack, light, param};

/// Programs address a 7x7 bank/number grid: A1..G7.
const PROGRAMS_PER_BANK: u8 = 7;

/// CV-derived program indices above this select the factory bank.
const FACTORY_CV_OFFSET: u8 = 48;

#[derive(Debug, Clone)]
pub struct ProgramState {
    /// Raw program index sent on the wire (0..127).
    pub target_program: u8,
    /// Factory vs. user bank table.
    pub factory: bool,
    factory_last: bool,
    bank_edge: RisingEdge,
    send_trigger: SchmittTrigger,
    /// Display bank letter, 'A'..'G'.
    pub current_bank: char,
    /// Display program number, 1..7.
    pub current_program: i32,
}

impl Default for ProgramState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramState {
    pub fn new() -> Self {
        Self {
            target_program: 0,
            factory: false,
            factory_last: false,
            bank_edge: RisingEdge::new(),
            send_trigger: SchmittTrigger::new(),
            current_bank: '0',
            current_program: 0,
        }
    }
}

impl Bridge {
    pub(crate) fn process_program(&mut self, surface: &mut Surface) {
        // Target program: CV has priority when patched, else the knob
        let pc_jack = surface.jack(jack::CV_PROGRAM);
        if pc_jack.connected {
            let input = pc_jack.voltage.clamp(0.0, 10.0);
            let mut target = (input / 10.0 * 127.0) as u8;
            if target > FACTORY_CV_OFFSET {
                target -= FACTORY_CV_OFFSET;
                if target > FACTORY_CV_OFFSET {
                    target = FACTORY_CV_OFFSET;
                }
                self.program.factory = true;
            } else {
                self.program.factory = false;
            }
            self.program.target_program = target;
        } else {
            self.program.target_program = surface.param(param::PROGRAM_KNOB) as u8;
        }

        // Bank button inverts the flag
        let bank_pressed = surface.param(param::PROGRAM_BANK) > 0.5;
        if self.program.bank_edge.process(bank_pressed) {
            self.program.factory = !self.program.factory;
        }

        // Any transition is announced as a bank-select CC pair
        if self.program.factory_last != self.program.factory {
            self.program.factory_last = self.program.factory;
            if self.program.factory {
                self.midi_out.set_value(1, 0);
                self.midi_out.set_value(0, 32);
            } else {
                self.midi_out.set_value(0, 0);
                self.midi_out.set_value(0, 32);
            }
        }

        // Inbound bank select forces the flag; both bytes are consumed so
        // a stale pair cannot re-trigger
        match (self.values_in[0], self.values_in[32]) {
            (Some(1), Some(0)) => {
                self.program.factory = true;
                self.values_in[0] = None;
                self.values_in[32] = None;
            }
            (Some(0), Some(0)) => {
                self.program.factory = false;
                self.values_in[0] = None;
                self.values_in[32] = None;
            }
            _ => {}
        }

        let factory = self.program.factory;
        surface.set_light(light::PC_BANK, if factory { 0.0 } else { 1.0 });
        surface.set_light(light::PC_BANK + 1, if factory { 1.0 } else { 0.0 });

        // Display fields; bank letters only exist for the 7x7 grid, larger
        // indices keep the previous letter
        let target = self.program.target_program;
        self.program.current_program = (target % PROGRAMS_PER_BANK) as i32 + 1;
        let bank_index = target / PROGRAMS_PER_BANK;
        if bank_index < PROGRAMS_PER_BANK {
            self.program.current_bank = (b'A' + bank_index) as char;
        }

        // Edge-triggered send, from the button or the CV trigger input
        let send_level = surface
            .param(param::PROGRAM_SEND)
            .max(surface.jack(jack::CV_PROGRAM_SEND).level());
        if self.program.send_trigger.process(send_level) {
            self.midi_out.send_program(self.program.target_program);
        }
    }
}
