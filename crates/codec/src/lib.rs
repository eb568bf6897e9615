//! OFDM subcarrier codec and symbol-start synchroniser
//!
//! `OfdmCodec` assembles a byte payload into one OFDM symbol (scramble,
//! QAM-map, place onto subcarriers, IFFT, cyclic-prefix) and reverses the
//! process on receive, in either the complex baseband domain or a real,
//! Nyquist-folded domain. `sync::find_symbol_start` locates a symbol's
//! start in a captured stream via coarse autocorrelation followed by
//! fine pilot-phase refinement.

pub mod codec;
pub mod config;
pub mod cyclic_prefix;
pub mod error;
pub mod nyquist;
pub mod qam;
pub mod scrambler;
pub mod subcarrier;
pub mod sync;

pub use error::{OfdmError, Result};

/// Re-export of the commonly used types.
pub mod prelude {
    pub use crate::{
        codec::{EncodedStream, EncodedSymbol, OfdmCodec, RealStreamDecoder, StreamDecoder},
        config::{CyclicPrefixLen, OfdmConfig, PilotLayout, Profile, SignalDomain},
        error::{OfdmError, Result},
        qam::SquareQam,
        scrambler::Scrambler,
        sync::SyncOutcome,
    };
}
