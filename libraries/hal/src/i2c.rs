/// Two-wire (I2C) bus interface used by register-mapped sensor drivers
use core::fmt::Debug;

/// Common interface for blocking I2C device operations
///
/// Addresses are 7-bit. Implementations own (or exclusively borrow) the bus;
/// no arbitration between devices happens at this level.
pub trait I2cDevice {
    /// Error reported by the underlying transport
    type Error: Debug;

    /// Write data to a device at the specified address
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Write data to a device and then read from it (combined operation)
    fn write_read(
        &mut self,
        addr: u8,
        write_data: &[u8],
        read_data: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Read a single register from a device
    fn read_reg(&mut self, addr: u8, reg: u8) -> Result<u8, Self::Error> {
        let mut buffer = [0u8; 1];
        self.write_read(addr, &[reg], &mut buffer)?;
        Ok(buffer[0])
    }

    /// Write to a single register on a device
    fn write_reg(&mut self, addr: u8, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.write(addr, &[reg, value])
    }

    /// Read multiple registers from a device
    fn read_regs(&mut self, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        self.write_read(addr, &[reg], data)
    }
}

impl<T: I2cDevice + ?Sized> I2cDevice for &mut T {
    type Error = T::Error;

    fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(addr, data)
    }

    fn write_read(
        &mut self,
        addr: u8,
        write_data: &[u8],
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        (**self).write_read(addr, write_data, read_data)
    }
}

/// Adapter exposing any `embedded-hal` blocking I2C bus as an [`I2cDevice`]
#[derive(Debug)]
pub struct HalI2c<I> {
    bus: I,
}

impl<I> HalI2c<I> {
    pub fn new(bus: I) -> Self {
        Self { bus }
    }

    /// Give the wrapped bus back
    pub fn into_inner(self) -> I {
        self.bus
    }
}

impl<I: embedded_hal::i2c::I2c> I2cDevice for HalI2c<I> {
    type Error = I::Error;

    fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.bus.write(addr, data)
    }

    fn write_read(
        &mut self,
        addr: u8,
        write_data: &[u8],
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.bus.write_read(addr, write_data, read_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    /// Register file answering at a single address
    struct FakeBus {
        addr: u8,
        pointer: usize,
        registers: [u8; 256],
    }

    impl FakeBus {
        fn new(addr: u8) -> Self {
            Self {
                addr,
                pointer: 0,
                registers: [0; 256],
            }
        }
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl embedded_hal::i2c::I2c for FakeBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if address != self.addr {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        if let Some((reg, values)) = bytes.split_first() {
                            self.pointer = *reg as usize;
                            for (i, value) in values.iter().enumerate() {
                                self.registers[(self.pointer + i) % 256] = *value;
                            }
                        }
                    }
                    Operation::Read(buffer) => {
                        for (i, byte) in buffer.iter_mut().enumerate() {
                            *byte = self.registers[(self.pointer + i) % 256];
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_register_helpers_through_adapter() {
        let mut bus = HalI2c::new(FakeBus::new(0x68));

        bus.write_reg(0x68, 0x6B, 0x00).unwrap();
        bus.write_reg(0x68, 0x43, 0xAB).unwrap();

        assert_eq!(bus.read_reg(0x68, 0x43).unwrap(), 0xAB);
        assert_eq!(bus.read_reg(0x68, 0x6B).unwrap(), 0x00);

        let mut pair = [0u8; 2];
        bus.write(0x68, &[0x3B, 0x12, 0x34]).unwrap();
        bus.read_regs(0x68, 0x3B, &mut pair).unwrap();
        assert_eq!(pair, [0x12, 0x34]);
    }

    #[test]
    fn test_adapter_propagates_bus_errors() {
        let mut bus = HalI2c::new(FakeBus::new(0x68));

        let err = bus.read_reg(0x69, 0x75).unwrap_err();
        assert_eq!(err, ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
    }

    fn write_temperature_high<D: I2cDevice>(mut device: D) -> Result<(), D::Error> {
        device.write_reg(0x68, 0x41, 0x7F)
    }

    #[test]
    fn test_mut_ref_forwards_to_device() {
        let mut fake = HalI2c::new(FakeBus::new(0x68));
        write_temperature_high(&mut fake).unwrap();
        assert_eq!(fake.into_inner().registers[0x41], 0x7F);
    }
}
