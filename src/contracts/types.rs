use std::fmt;

/// The contracts making up the university suite.
///
/// Each variant carries its artifact file names and the ordered list of
/// contracts whose addresses its constructor expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContractType {
    Professor,
    Student,
    Course,
    Enrollment,
    University,
}

impl ContractType {
    pub const ALL: [ContractType; 5] = [
        ContractType::Professor,
        ContractType::Student,
        ContractType::Course,
        ContractType::Enrollment,
        ContractType::University,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ContractType::Professor => "Professor",
            ContractType::Student => "Student",
            ContractType::Course => "Course",
            ContractType::Enrollment => "Enrollment",
            ContractType::University => "University",
        }
    }

    pub const fn abi_filename(self) -> &'static str {
        match self {
            ContractType::Professor => "Professor.abi",
            ContractType::Student => "Student.abi",
            ContractType::Course => "Course.abi",
            ContractType::Enrollment => "Enrollment.abi",
            ContractType::University => "University.abi",
        }
    }

    pub const fn bin_filename(self) -> &'static str {
        match self {
            ContractType::Professor => "Professor.bin",
            ContractType::Student => "Student.bin",
            ContractType::Course => "Course.bin",
            ContractType::Enrollment => "Enrollment.bin",
            ContractType::University => "University.bin",
        }
    }

    /// Constructor dependencies, in constructor argument order.
    pub const fn dependencies(self) -> &'static [ContractType] {
        match self {
            ContractType::Professor | ContractType::Student => &[],
            ContractType::Course => &[ContractType::Professor],
            ContractType::Enrollment => &[
                ContractType::Student,
                ContractType::Professor,
                ContractType::Course,
            ],
            ContractType::University => &[
                ContractType::Student,
                ContractType::Professor,
                ContractType::Course,
                ContractType::Enrollment,
            ],
        }
    }
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
