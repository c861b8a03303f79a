//! Mock versions of std::fs::File and of the reader's collaborators.
use mockall::mock;

use std::io::{self, Write};

use csv_mapper_rs::{
    core::{
        item::{IssueWriter, LineSource},
        validation::ValidationIssue,
    },
    MappingError,
};

mock! {
    pub File {}
    impl Write for File {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}

mock! {
    pub IssueWriter {}
    impl IssueWriter for IssueWriter {
        fn write(&self, issues: &[ValidationIssue]) -> Result<(), MappingError>;
    }
}

mock! {
    pub LineSource {}
    impl LineSource for LineSource {
        fn name(&self) -> String;
        fn read_lines(&self) -> Result<Vec<String>, MappingError>;
    }
}
