#![allow(unused)]

/* #region for API callers */

pub use crate::error::MP3Error;
pub use crate::structs::{MP3Config, MP3Info, MP3Results, RHFResults, SCFConfig};

/* #endregion */

/* #region for developers */

// RSTSR backend specification
#[cfg(not(feature = "use_openblas"))]
pub(crate) type DeviceTsr = DeviceFaer;
#[cfg(feature = "use_openblas")]
pub(crate) type DeviceTsr = DeviceOpenBLAS;

pub(crate) use itertools::{Itertools, iproduct};
pub(crate) use libcint::prelude::*;
pub(crate) use rayon::prelude::*;
pub(crate) use rstsr::prelude::*;

pub(crate) use crate::error::check_shape;
pub(crate) use crate::*;

pub(crate) type Tsr<D = IxD> = Tensor<f64, DeviceTsr, D>;
pub(crate) type TsrView<'a, D = IxD> = TensorView<'a, f64, DeviceTsr, D>;
pub(crate) type TsrMut<'a, D = IxD> = TensorMut<'a, f64, DeviceTsr, D>;

/* #endregion */
