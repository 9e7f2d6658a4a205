// SPDX-License-Identifier: Apache-2.0

pub(crate) mod datasets;
pub(crate) mod file_types;
pub(crate) mod grids;
pub(crate) mod pages;
pub(crate) mod response;
