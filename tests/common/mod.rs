/*!
 * Test Support
 * Recording fake of the launcher's OS seam
 */

#![allow(dead_code)]

use std::cell::RefCell;
use std::ffi::{OsStr, OsString};
use std::io;
use std::rc::Rc;

use rununiproc::launcher::{
    AffinityMask, AttributeBuffer, CommandLine, InheritList, Platform, SearchOutcome, StdHandles,
};

pub const ACCESS_DENIED: i32 = 5;
pub const FILE_NOT_FOUND: i32 = 2;
pub const FAKE_PID: u32 = 4242;
pub const FAKE_ATTRIBUTE_SIZE: usize = 48;

pub const STDIN: FakeHandle = FakeHandle(100);
pub const STDOUT: FakeHandle = FakeHandle(101);
pub const STDERR: FakeHandle = FakeHandle(102);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeHandle(pub u32);

/// OS calls the fake can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AffinityMask,
    CreateContainment,
    RestrictAffinity,
    AttributeSize,
    InitializeAttributes,
    InheritOnly,
    CreateProcess,
    Assign,
    Resume,
    Terminate,
    Wait,
    ExitCode,
}

/// Successful OS calls and releases, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    QueryAffinity,
    CreateContainment,
    RestrictAffinity(usize),
    CloseContainment,
    SizeAttributes(u32),
    InitializeAttributes { size: usize, count: u32 },
    InheritOnly(Vec<FakeHandle>),
    DeleteAttributes,
    Search { name: String, extension: String, capacity: usize },
    CreateSuspended {
        application: String,
        line: String,
        inherited: Option<Vec<FakeHandle>>,
        stdio: [FakeHandle; 3],
    },
    Assign(u32),
    Resume(u32),
    Terminate { pid: u32, exit_code: u32 },
    Wait(u32),
    QueryExitCode(u32),
    CloseChild(u32),
}

/// Canned search-path result
#[derive(Debug, Clone)]
pub enum FakeSearch {
    Found(String),
    Truncated(usize),
    Missing,
}

type Log = Rc<RefCell<Vec<Event>>>;

pub struct FakeContainment {
    log: Log,
}

impl Drop for FakeContainment {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Event::CloseContainment);
    }
}

pub struct FakeAttributes {
    log: Log,
    inherited: Option<Vec<FakeHandle>>,
}

impl Drop for FakeAttributes {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Event::DeleteAttributes);
    }
}

pub struct FakeChild {
    log: Log,
    pid: u32,
}

impl Drop for FakeChild {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Event::CloseChild(self.pid));
    }
}

pub struct FakePlatform {
    mask: usize,
    attribute_size: usize,
    exit_code: u32,
    search: FakeSearch,
    failing: Vec<Step>,
    log: Log,
}

impl FakePlatform {
    /// Two CPUs available (1 and 2), child exits with 0
    pub fn new() -> Self {
        Self {
            mask: 0b0110,
            attribute_size: FAKE_ATTRIBUTE_SIZE,
            exit_code: 0,
            search: FakeSearch::Missing,
            failing: Vec::new(),
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_mask(mut self, mask: usize) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_exit_code(mut self, code: u32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn with_attribute_size(mut self, size: usize) -> Self {
        self.attribute_size = size;
        self
    }

    pub fn with_search(mut self, search: FakeSearch) -> Self {
        self.search = search;
        self
    }

    pub fn failing_at(mut self, step: Step) -> Self {
        self.failing.push(step);
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    pub fn saw(&self, event: &Event) -> bool {
        self.log.borrow().contains(event)
    }

    pub fn position(&self, event: &Event) -> Option<usize> {
        self.log.borrow().iter().position(|e| e == event)
    }

    pub fn created_process(&self) -> bool {
        self.log
            .borrow()
            .iter()
            .any(|e| matches!(e, Event::CreateSuspended { .. }))
    }

    fn record(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }

    fn attempt(&self, step: Step) -> io::Result<()> {
        if self.failing.contains(&step) {
            Err(io::Error::from_raw_os_error(ACCESS_DENIED))
        } else {
            Ok(())
        }
    }
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn lossy(s: &OsStr) -> String {
    s.to_string_lossy().into_owned()
}

impl Platform for FakePlatform {
    type Handle = FakeHandle;
    type Containment = FakeContainment;
    type AttributeList = FakeAttributes;
    type Child = FakeChild;

    fn affinity_mask(&self) -> io::Result<AffinityMask> {
        self.attempt(Step::AffinityMask)?;
        self.record(Event::QueryAffinity);
        Ok(AffinityMask::new(self.mask))
    }

    fn create_containment(&self) -> io::Result<FakeContainment> {
        self.attempt(Step::CreateContainment)?;
        self.record(Event::CreateContainment);
        Ok(FakeContainment {
            log: self.log.clone(),
        })
    }

    fn restrict_affinity(&self, _containment: &FakeContainment, mask: AffinityMask) -> io::Result<()> {
        self.attempt(Step::RestrictAffinity)?;
        self.record(Event::RestrictAffinity(mask.bits()));
        Ok(())
    }

    fn std_handles(&self) -> StdHandles<FakeHandle> {
        StdHandles::new(STDIN, STDOUT, STDERR)
    }

    fn attribute_list_size(&self, count: u32) -> io::Result<usize> {
        self.attempt(Step::AttributeSize)?;
        self.record(Event::SizeAttributes(count));
        Ok(self.attribute_size)
    }

    fn initialize_attribute_list(&self, buffer: AttributeBuffer, count: u32) -> io::Result<FakeAttributes> {
        self.attempt(Step::InitializeAttributes)?;
        self.record(Event::InitializeAttributes {
            size: buffer.size(),
            count,
        });
        Ok(FakeAttributes {
            log: self.log.clone(),
            inherited: None,
        })
    }

    fn inherit_only(&self, attributes: &mut FakeAttributes, handles: InheritList<FakeHandle>) -> io::Result<()> {
        self.attempt(Step::InheritOnly)?;
        self.record(Event::InheritOnly(handles.as_slice().to_vec()));
        attributes.inherited = Some(handles.as_slice().to_vec());
        Ok(())
    }

    fn search_path(&self, name: &OsStr, extension: &OsStr, capacity: usize) -> SearchOutcome {
        self.record(Event::Search {
            name: lossy(name),
            extension: lossy(extension),
            capacity,
        });
        match &self.search {
            FakeSearch::Found(path) => SearchOutcome::Found(OsString::from(path)),
            FakeSearch::Truncated(required) => SearchOutcome::Truncated {
                required: *required,
            },
            FakeSearch::Missing => SearchOutcome::NotFound(io::Error::from_raw_os_error(FILE_NOT_FOUND)),
        }
    }

    fn create_suspended(
        &self,
        command: &CommandLine,
        attributes: &FakeAttributes,
        stdio: StdHandles<FakeHandle>,
    ) -> io::Result<FakeChild> {
        self.attempt(Step::CreateProcess)?;
        self.record(Event::CreateSuspended {
            application: lossy(command.application()),
            line: lossy(command.line()),
            inherited: attributes.inherited.clone(),
            stdio: [stdio.input, stdio.output, stdio.error],
        });
        Ok(FakeChild {
            log: self.log.clone(),
            pid: FAKE_PID,
        })
    }

    fn child_id(&self, child: &FakeChild) -> u32 {
        child.pid
    }

    fn assign(&self, _containment: &FakeContainment, child: &FakeChild) -> io::Result<()> {
        self.attempt(Step::Assign)?;
        self.record(Event::Assign(child.pid));
        Ok(())
    }

    fn resume(&self, child: &FakeChild) -> io::Result<()> {
        self.attempt(Step::Resume)?;
        self.record(Event::Resume(child.pid));
        Ok(())
    }

    fn terminate(&self, child: &FakeChild, exit_code: u32) -> io::Result<()> {
        self.attempt(Step::Terminate)?;
        self.record(Event::Terminate {
            pid: child.pid,
            exit_code,
        });
        Ok(())
    }

    fn wait(&self, child: &FakeChild) -> io::Result<()> {
        self.attempt(Step::Wait)?;
        self.record(Event::Wait(child.pid));
        Ok(())
    }

    fn exit_code(&self, child: &FakeChild) -> io::Result<u32> {
        self.attempt(Step::ExitCode)?;
        self.record(Event::QueryExitCode(child.pid));
        Ok(self.exit_code)
    }
}

/// Build an argument vector from string literals
pub fn args(values: &[&str]) -> Vec<OsString> {
    values.iter().map(OsString::from).collect()
}
