//! MPU-6050 register-level driver
//!
//! The bus transaction layer is abstracted behind [`RegisterBus`]; this module
//! only knows the register map, the init sequence and the word decoding.

use contracts::{AccelRange, ContractError, GyroRange, SampleSource, SensorRangeConfig, Vector3};
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Default I2C address (AD0 low)
pub const MPU6050_ADDR: u8 = 0x68;

pub const PWR_MGMT_1: u8 = 0x6B;
pub const CONFIG: u8 = 0x1A;
pub const GYRO_CONFIG: u8 = 0x1B;
pub const ACCEL_CONFIG: u8 = 0x1C;
pub const ACCEL_XOUT_H: u8 = 0x3B;
pub const GYRO_XOUT_H: u8 = 0x43;

/// Wake up, clock from the X gyro PLL
const PWR_WAKE_PLL: u8 = 0x01;
/// DLPF ~44 Hz
const DLPF_44HZ: u8 = 0x03;

/// Bus transaction failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("no acknowledge from device")]
    Nack,

    #[error("bus timeout")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

/// Byte-level register access to a device on a shared bus
pub trait RegisterBus: Send {
    fn write_byte(&mut self, address: u8, register: u8, value: u8) -> Result<(), BusError>;

    fn read_byte(&mut self, address: u8, register: u8) -> Result<u8, BusError>;
}

/// MPU-6050 sample source
pub struct Mpu6050Source<B> {
    name: String,
    bus: B,
    address: u8,
    ranges: SensorRangeConfig,
}

impl<B: RegisterBus> Mpu6050Source<B> {
    /// Initialise the device at the default address
    pub fn new(bus: B, ranges: SensorRangeConfig) -> Result<Self, ContractError> {
        Self::with_address(bus, MPU6050_ADDR, ranges)
    }

    pub fn with_address(
        bus: B,
        address: u8,
        ranges: SensorRangeConfig,
    ) -> Result<Self, ContractError> {
        let mut source = Self {
            name: format!("mpu6050@0x{address:02X}"),
            bus,
            address,
            ranges,
        };
        source.init()?;
        Ok(source)
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn gyro_range(&self) -> GyroRange {
        self.ranges.gyro_range
    }

    pub fn accel_range(&self) -> AccelRange {
        self.ranges.accel_range
    }

    #[instrument(name = "mpu6050_init", skip(self), fields(address = self.address))]
    fn init(&mut self) -> Result<(), ContractError> {
        self.write(PWR_MGMT_1, PWR_WAKE_PLL)?;
        self.write(CONFIG, DLPF_44HZ)?;
        self.write(ACCEL_CONFIG, self.ranges.accel_range.register_bits())?;
        self.write(GYRO_CONFIG, self.ranges.gyro_range.register_bits())?;

        info!(
            source = %self.name,
            gyro_range = ?self.ranges.gyro_range,
            accel_range = ?self.ranges.accel_range,
            "MPU-6050 initialised"
        );
        Ok(())
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), ContractError> {
        self.bus
            .write_byte(self.address, register, value)
            .map_err(|e| ContractError::sensor_bus(self.address, register, e.to_string()))
    }

    fn read(&mut self, register: u8) -> Result<u8, ContractError> {
        self.bus
            .read_byte(self.address, register)
            .map_err(|e| ContractError::sensor_bus(self.address, register, e.to_string()))
    }

    /// Signed 16-bit word, high byte first
    ///
    /// `register` must leave room for the low byte; 0xFF is a `SensorBus` error.
    pub fn read_word(&mut self, register: u8) -> Result<i16, ContractError> {
        let Some(low_register) = register.checked_add(1) else {
            return Err(ContractError::sensor_bus(
                self.address,
                register,
                "word read runs past the last register",
            ));
        };
        let high = self.read(register)?;
        let low = self.read(low_register)?;
        Ok(i16::from_be_bytes([high, low]))
    }

    /// Three consecutive words starting at `base`
    fn read_axes(&mut self, base: u8) -> Result<Vector3, ContractError> {
        let x = self.read_word(base)?;
        let y = self.read_word(base + 2)?;
        let z = self.read_word(base + 4)?;
        Ok(Vector3::new(f64::from(x), f64::from(y), f64::from(z)))
    }
}

impl<B: RegisterBus> SampleSource for Mpu6050Source<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_accel(&mut self) -> Result<Vector3, ContractError> {
        let raw = self.read_axes(ACCEL_XOUT_H)?;
        Ok(raw / self.ranges.accel_range.sensitivity())
    }

    fn read_gyro(&mut self) -> Result<Vector3, ContractError> {
        let raw = self.read_axes(GYRO_XOUT_H)?;
        debug!(x = raw.x, y = raw.y, z = raw.z, "gyro raw");
        Ok(raw)
    }
}
