// SPDX-License-Identifier: Apache-2.0

pub(crate) mod charts;
pub(crate) mod html;
pub(crate) mod wordcloud;
