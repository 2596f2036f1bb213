//! RawSample - Sample Source 输出
//!
//! 原始 IMU 采样与陀螺仪零偏结构。

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

/// 3D 向量
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// 零向量
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 点积
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// 欧氏范数
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// 逐分量近似比较
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        (self.x - other.x).abs() <= tol
            && (self.y - other.y).abs() <= tol
            && (self.z - other.z).abs() <= tol
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vector3 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// 单次 IMU 原始采样
///
/// 每个 tick 由 Sample Source 产生一次，采集后不可变。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// 加速度 (g)
    pub acceleration: Vector3,

    /// 角速度 (原始 LSB)
    pub angular_rate: Vector3,
}

/// 陀螺仪零偏
///
/// 静止状态下 N 次采样的均值，启动时计算一次，运行期间不再修改。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationOffset(Vector3);

impl CalibrationOffset {
    pub fn new(offset: Vector3) -> Self {
        Self(offset)
    }

    /// 零偏向量 (原始 LSB)
    pub fn vector(&self) -> Vector3 {
        self.0
    }

    /// 扣除零偏
    pub fn correct(&self, gyro_raw: Vector3) -> Vector3 {
        gyro_raw - self.0
    }
}
