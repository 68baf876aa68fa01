//! In-memory storage handle for tests
//!
//! Simulates a file without any system calls. The state lives behind an
//! `Arc<Mutex<..>>` so a test can keep a [`MockProbe`] and inspect what the
//! executor did after the handle itself has been moved into it.
//!
//! Failures can be injected for writes, reads and syncs.

use super::{AccessHint, StorageHandle};
use crate::config::IoMode;
use crate::error::BenchError;
use crate::Result;
use std::io;
use std::sync::{Arc, Mutex};

/// Kind of call recorded by the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOp {
    Read,
    Write,
    Sync,
    FullSync,
}

/// Record of one call for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub op: MockOp,
    pub offset: u64,
    pub length: usize,
}

#[derive(Debug, Default)]
struct MockState {
    data: Vec<u8>,
    operations: Vec<OperationRecord>,
    hints: Vec<AccessHint>,
    fail_sync: bool,
    /// Fail the write with this 0-based index
    fail_write_at: Option<usize>,
    fail_read_at: Option<usize>,
    writes: usize,
    reads: usize,
}

/// Mock storage handle
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
    mode: IoMode,
}

/// Shared view of a [`MockHandle`]'s state
#[derive(Clone)]
pub struct MockProbe {
    state: Arc<Mutex<MockState>>,
}

impl MockHandle {
    /// Create a mock file of `size` zero bytes
    pub fn new(size: u64, mode: IoMode) -> Self {
        let state = MockState {
            data: vec![0u8; size as usize],
            ..MockState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            mode,
        }
    }

    pub fn probe(&self) -> MockProbe {
        MockProbe {
            state: Arc::clone(&self.state),
        }
    }

    /// Make every `sync`/`full_sync` fail
    pub fn fail_sync(self) -> Self {
        self.state.lock().unwrap().fail_sync = true;
        self
    }

    /// Fail the `index`-th write (0-based)
    pub fn fail_write_at(self, index: usize) -> Self {
        self.state.lock().unwrap().fail_write_at = Some(index);
        self
    }

    /// Fail the `index`-th read (0-based)
    pub fn fail_read_at(self, index: usize) -> Self {
        self.state.lock().unwrap().fail_read_at = Some(index);
        self
    }
}

impl MockProbe {
    pub fn operations(&self) -> Vec<OperationRecord> {
        self.state.lock().unwrap().operations.clone()
    }

    pub fn count(&self, op: MockOp) -> usize {
        self.state
            .lock()
            .unwrap()
            .operations
            .iter()
            .filter(|r| r.op == op)
            .count()
    }

    pub fn hints(&self) -> Vec<AccessHint> {
        self.state.lock().unwrap().hints.clone()
    }

    pub fn data(&self) -> Vec<u8> {
        self.state.lock().unwrap().data.clone()
    }
}

fn injected() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "injected mock failure")
}

impl StorageHandle for MockHandle {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let index = state.reads;
        state.reads += 1;
        state.operations.push(OperationRecord {
            op: MockOp::Read,
            offset,
            length: buf.len(),
        });

        if state.fail_read_at == Some(index) {
            return Err(BenchError::Read {
                offset,
                len: buf.len(),
                source: injected(),
            });
        }

        let start = (offset as usize).min(state.data.len());
        let end = (start + buf.len()).min(state.data.len());
        let n = end - start;
        buf[..n].copy_from_slice(&state.data[start..end]);
        Ok(n)
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        let index = state.writes;
        state.writes += 1;
        state.operations.push(OperationRecord {
            op: MockOp::Write,
            offset,
            length: buf.len(),
        });

        if state.fail_write_at == Some(index) {
            return Err(BenchError::Write {
                offset,
                len: buf.len(),
                source: injected(),
            });
        }

        let start = offset as usize;
        let end = start + buf.len();
        if state.data.len() < end {
            state.data.resize(end, 0);
        }
        state.data[start..end].copy_from_slice(buf);
        Ok(buf.len())
    }

    fn sync(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.operations.push(OperationRecord {
            op: MockOp::Sync,
            offset: 0,
            length: 0,
        });
        if state.fail_sync {
            return Err(BenchError::Sync { source: injected() });
        }
        Ok(())
    }

    fn full_sync(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.operations.push(OperationRecord {
            op: MockOp::FullSync,
            offset: 0,
            length: 0,
        });
        if state.fail_sync {
            return Err(BenchError::Sync { source: injected() });
        }
        Ok(())
    }

    fn set_access_hint(&mut self, hint: AccessHint) {
        self.state.lock().unwrap().hints.push(hint);
    }

    fn mode(&self) -> IoMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_write_read() {
        let mut handle = MockHandle::new(8192, IoMode::Cached);
        let probe = handle.probe();

        assert_eq!(handle.write_at(4096, &[7u8; 16]).unwrap(), 16);
        let mut buf = [0u8; 16];
        assert_eq!(handle.read_at(4096, &mut buf).unwrap(), 16);
        assert_eq!(buf, [7u8; 16]);

        let ops = probe.operations();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0], OperationRecord { op: MockOp::Write, offset: 4096, length: 16 });
        assert_eq!(ops[1].op, MockOp::Read);
    }

    #[test]
    fn test_mock_short_read_at_end() {
        let mut handle = MockHandle::new(100, IoMode::Cached);
        let mut buf = [0u8; 64];
        assert_eq!(handle.read_at(80, &mut buf).unwrap(), 20);
        assert_eq!(handle.read_at(200, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_mock_injected_failures() {
        let mut handle = MockHandle::new(4096, IoMode::Cached)
            .fail_write_at(1)
            .fail_sync();
        assert!(handle.write_at(0, &[1u8; 8]).is_ok());
        assert!(matches!(handle.write_at(0, &[1u8; 8]), Err(BenchError::Write { .. })));
        assert!(handle.write_at(0, &[1u8; 8]).is_ok());
        assert!(matches!(handle.sync(), Err(BenchError::Sync { .. })));
    }

    #[test]
    fn test_mock_bulk_fill_uses_full_sync() {
        let mut handle = MockHandle::new(0, IoMode::Cached);
        let probe = handle.probe();
        assert_eq!(handle.bulk_fill(10_000, &[3u8; 4096]).unwrap(), 10_000);
        assert_eq!(probe.count(MockOp::Write), 3);
        assert_eq!(probe.count(MockOp::FullSync), 1);
        assert_eq!(probe.data().len(), 10_000);
    }

    #[test]
    fn test_mock_records_hints() {
        let mut handle = MockHandle::new(0, IoMode::Direct);
        handle.set_access_hint(AccessHint::DropCache);
        handle.set_access_hint(AccessHint::Random);
        assert_eq!(handle.probe().hints(), vec![AccessHint::DropCache, AccessHint::Random]);
        assert_eq!(handle.mode(), IoMode::Direct);
    }
}
