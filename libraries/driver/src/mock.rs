//! Mock bus and clock for driver tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use hal::{Clock, I2cDevice};

/// Bus transaction recorded by [`MockBus`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Write { addr: u8, data: Vec<u8> },
    WriteRead { addr: u8, write_data: Vec<u8>, read_len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

#[derive(Debug)]
struct BusState {
    registers: [u8; 256],
    transactions: Vec<Transaction>,
    failing: bool,
}

/// Register-file bus shared between the test and the driver under test
#[derive(Debug, Clone)]
pub struct MockBus {
    state: Rc<RefCell<BusState>>,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(BusState {
                registers: [0; 256],
                transactions: Vec::new(),
                failing: false,
            })),
        }
    }

    pub fn register(&self, reg: u8) -> u8 {
        self.state.borrow().registers[reg as usize]
    }

    pub fn set_register(&self, reg: u8, value: u8) {
        self.state.borrow_mut().registers[reg as usize] = value;
    }

    /// Store a signed 16-bit value big-endian at `reg` and `reg + 1`
    pub fn set_raw(&self, reg: u8, value: i16) {
        let [high, low] = value.to_be_bytes();
        let mut state = self.state.borrow_mut();
        state.registers[reg as usize] = high;
        state.registers[reg as usize + 1] = low;
    }

    pub fn set_gyro_raw(&self, x: i16, y: i16, z: i16) {
        self.set_raw(0x43, x);
        self.set_raw(0x45, y);
        self.set_raw(0x47, z);
    }

    pub fn set_accel_raw(&self, x: i16, y: i16, z: i16) {
        self.set_raw(0x3B, x);
        self.set_raw(0x3D, y);
        self.set_raw(0x3F, z);
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.borrow_mut().failing = failing;
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.borrow().transactions.clone()
    }

    pub fn clear_transactions(&self) {
        self.state.borrow_mut().transactions.clear();
    }
}

impl I2cDevice for MockBus {
    type Error = MockBusError;

    fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.failing {
            return Err(MockBusError);
        }
        state.transactions.push(Transaction::Write {
            addr,
            data: data.to_vec(),
        });
        if let Some((reg, values)) = data.split_first() {
            for (i, value) in values.iter().enumerate() {
                state.registers[(*reg as usize + i) % 256] = *value;
            }
        }
        Ok(())
    }

    fn write_read(
        &mut self,
        addr: u8,
        write_data: &[u8],
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.failing {
            return Err(MockBusError);
        }
        state.transactions.push(Transaction::WriteRead {
            addr,
            write_data: write_data.to_vec(),
            read_len: read_data.len(),
        });
        let reg = write_data.first().copied().unwrap_or(0) as usize;
        for (i, byte) in read_data.iter_mut().enumerate() {
            *byte = state.registers[(reg + i) % 256];
        }
        Ok(())
    }
}

/// Settable millisecond clock; `delay_ms` advances it instantly
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Rc<Cell<u32>>,
    delays: Rc<RefCell<Vec<u32>>>,
}

impl MockClock {
    pub fn new(start_ms: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
            delays: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn set(&self, now_ms: u32) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    /// Every delay requested so far, in call order
    pub fn delays(&self) -> Vec<u32> {
        self.delays.borrow().clone()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.borrow_mut().push(ms);
        self.advance(ms);
    }
}
