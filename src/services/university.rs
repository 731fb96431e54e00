use alloy::dyn_abi::DynSolValue;
use alloy::primitives::Address;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::contracts::abi::codec::{
    address, as_string, as_string_list, as_u64, as_u64_list, field, string, uint,
    uint_array,
};
use crate::contracts::abi::{events, functions};
use crate::contracts::{ContractHandle, ContractResolver, ContractType};
use crate::error::{Result, UniversityError};
use crate::models::{
    Course, Enrollment, EnrollmentEvent, Page, Professor, Sender, Student, StudentUpdate,
    TxOptions, TxOutcome,
};
use crate::services::events::{EventWatcher, WatchHandle};

/// Entity-level operations on the University contract.
///
/// Every operation validates its input first, then resolves the University
/// contract through the [`ContractResolver`] (deploying the suite if it is
/// missing) and issues one call or transaction.
pub struct UniversityDataSource {
    resolver: Arc<ContractResolver>,
    default_account: Address,
    admin_account: Address,
}

impl UniversityDataSource {
    /// Ordinary writes come from the configured sender (the deployer when no
    /// sender key is set); privileged writes always come from the deployer.
    pub fn new(resolver: Arc<ContractResolver>) -> Self {
        let sender = resolver.sender_address();
        let deployer = resolver.deployer_address();
        Self::with_accounts(resolver, sender, deployer)
    }

    pub fn with_accounts(
        resolver: Arc<ContractResolver>,
        default_account: Address,
        admin_account: Address,
    ) -> Self {
        Self {
            resolver,
            default_account,
            admin_account,
        }
    }

    pub fn account(&self, sender: Sender) -> Address {
        match sender {
            Sender::Default => self.default_account,
            Sender::Admin => self.admin_account,
        }
    }

    async fn university(&self) -> Result<ContractHandle> {
        self.resolver.ensure_deployed(ContractType::University).await
    }

    async fn write(
        &self,
        function: &str,
        args: Vec<DynSolValue>,
        sender: Sender,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        let contract = self.university().await?;
        contract
            .transact(function, &args, self.account(sender), options)
            .await
    }

    async fn read(&self, function: &str, args: Vec<DynSolValue>) -> Result<Vec<DynSolValue>> {
        let contract = self.university().await?;
        contract.call(function, &args, self.default_account).await
    }

    /// List-shaped read: any failure past validation yields an empty list.
    async fn read_list<T>(
        &self,
        function: &str,
        args: Vec<DynSolValue>,
        decode: impl FnOnce(&[DynSolValue]) -> Result<Vec<T>>,
    ) -> Vec<T> {
        match self.read(function, args).await.and_then(|values| decode(&values)) {
            Ok(items) => items,
            Err(e) => {
                warn!("⚠️ {} failed, returning empty list: {}", function, e);
                Vec::new()
            }
        }
    }

    async fn read_ids(&self, function: &str, args: Vec<DynSolValue>) -> Vec<u64> {
        self.read_list(function, args, |values| as_u64_list(field(values, 0)?))
            .await
    }

    // Student operations

    pub async fn add_student(
        &self,
        name: &str,
        major: &str,
        year: u64,
        professor_id: u64,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        require_text("name", name)?;
        require_text("major", major)?;
        require_positive("year", year)?;
        require_positive("professor_id", professor_id)?;

        let outcome = self
            .write(
                functions::ADD_STUDENT,
                vec![string(name), string(major), uint(year), uint(professor_id)],
                Sender::Default,
                options,
            )
            .await?;
        info!("Student {} added", name);
        Ok(outcome)
    }

    pub async fn get_student(&self, student_id: u64) -> Result<Student> {
        require_positive("student_id", student_id)?;

        let values = self
            .read(functions::GET_STUDENT, vec![uint(student_id)])
            .await?;
        decode_record(functions::GET_STUDENT, || {
            Ok(Student {
                id: as_u64(field(&values, 0)?)?,
                name: as_string(field(&values, 1)?)?,
                major: as_string(field(&values, 2)?)?,
                year: as_u64(field(&values, 3)?)?,
                professor_id: as_u64(field(&values, 4)?)?,
            })
        })
    }

    pub async fn update_student(
        &self,
        student_id: u64,
        update: &StudentUpdate,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        require_positive("student_id", student_id)?;
        if update.is_empty() {
            return Err(UniversityError::validation("update must change at least one field"));
        }
        if let Some(name) = &update.name {
            require_text("name", name)?;
        }
        if let Some(major) = &update.major {
            require_text("major", major)?;
        }
        if let Some(year) = update.year {
            require_positive("year", year)?;
        }
        if let Some(professor_id) = update.professor_id {
            require_positive("professor_id", professor_id)?;
        }

        self.write(
            functions::UPDATE_STUDENT,
            vec![
                uint(student_id),
                string(update.name.clone().unwrap_or_default()),
                string(update.major.clone().unwrap_or_default()),
                uint(update.year.unwrap_or(0)),
                uint(update.professor_id.unwrap_or(0)),
            ],
            Sender::Default,
            options,
        )
        .await
    }

    pub async fn delete_student(&self, student_id: u64, options: &TxOptions) -> Result<TxOutcome> {
        require_positive("student_id", student_id)?;
        self.write(
            functions::DELETE_STUDENT,
            vec![uint(student_id)],
            Sender::Default,
            options,
        )
        .await
    }

    pub async fn get_all_students(&self, page: Page) -> Vec<u64> {
        page.apply(self.read_ids(functions::GET_ALL_STUDENTS, vec![]).await)
    }

    // Professor operations

    pub async fn add_professor(
        &self,
        name: &str,
        department: &str,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        require_text("name", name)?;
        require_text("department", department)?;

        let outcome = self
            .write(
                functions::ADD_PROFESSOR,
                vec![string(name), string(department)],
                Sender::Default,
                options,
            )
            .await?;
        info!("Professor {} added", name);
        Ok(outcome)
    }

    pub async fn get_professor(&self, professor_id: u64) -> Result<Professor> {
        require_positive("professor_id", professor_id)?;

        let values = self
            .read(functions::GET_PROFESSOR, vec![uint(professor_id)])
            .await?;
        decode_record(functions::GET_PROFESSOR, || {
            Ok(Professor {
                id: as_u64(field(&values, 0)?)?,
                name: as_string(field(&values, 1)?)?,
                department: as_string(field(&values, 2)?)?,
            })
        })
    }

    pub async fn delete_professor(
        &self,
        professor_id: u64,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        require_positive("professor_id", professor_id)?;
        self.write(
            functions::DELETE_PROFESSOR,
            vec![uint(professor_id)],
            Sender::Default,
            options,
        )
        .await
    }

    pub async fn get_all_professors(&self, page: Page) -> Vec<u64> {
        page.apply(self.read_ids(functions::GET_ALL_PROFESSORS, vec![]).await)
    }

    /// Privileged: signed by the admin account.
    pub async fn authorize_instructor(
        &self,
        instructor: Address,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        if instructor.is_zero() {
            return Err(UniversityError::validation("instructor must not be the zero address"));
        }
        self.write(
            functions::AUTHORIZE_INSTRUCTOR,
            vec![address(instructor)],
            Sender::Admin,
            options,
        )
        .await
    }

    // Course operations

    pub async fn create_course(
        &self,
        course_id: u64,
        name: &str,
        professor_id: u64,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        require_positive("course_id", course_id)?;
        require_text("name", name)?;
        require_positive("professor_id", professor_id)?;

        self.write(
            functions::CREATE_COURSE,
            vec![uint(course_id), string(name), uint(professor_id)],
            Sender::Default,
            options,
        )
        .await
    }

    pub async fn get_course(&self, course_id: u64) -> Result<Course> {
        require_positive("course_id", course_id)?;

        let values = self.read(functions::GET_COURSE, vec![uint(course_id)]).await?;
        decode_record(functions::GET_COURSE, || {
            Ok(Course {
                id: as_u64(field(&values, 0)?)?,
                name: as_string(field(&values, 1)?)?,
                professor_id: as_u64(field(&values, 2)?)?,
            })
        })
    }

    pub async fn reassign_course(
        &self,
        course_id: u64,
        new_professor_id: u64,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        require_positive("course_id", course_id)?;
        require_positive("new_professor_id", new_professor_id)?;
        self.write(
            functions::REASSIGN_COURSE,
            vec![uint(course_id), uint(new_professor_id)],
            Sender::Default,
            options,
        )
        .await
    }

    pub async fn delete_course(&self, course_id: u64, options: &TxOptions) -> Result<TxOutcome> {
        require_positive("course_id", course_id)?;
        self.write(
            functions::DELETE_COURSE,
            vec![uint(course_id)],
            Sender::Default,
            options,
        )
        .await
    }

    pub async fn get_all_courses(&self, page: Page) -> Vec<u64> {
        page.apply(self.read_ids(functions::GET_ALL_COURSES, vec![]).await)
    }

    pub async fn get_courses_by_professor(&self, professor_id: u64) -> Result<Vec<u64>> {
        require_positive("professor_id", professor_id)?;
        Ok(self
            .read_ids(functions::GET_COURSES_BY_PROFESSOR, vec![uint(professor_id)])
            .await)
    }

    // Enrollment operations

    pub async fn enroll_student_in_course(
        &self,
        student_id: u64,
        course_id: u64,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        require_positive("student_id", student_id)?;
        require_positive("course_id", course_id)?;
        self.write(
            functions::ENROLL_STUDENT_IN_COURSE,
            vec![uint(student_id), uint(course_id)],
            Sender::Default,
            options,
        )
        .await
    }

    pub async fn remove_course_from_student(
        &self,
        student_id: u64,
        course_id: u64,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        require_positive("student_id", student_id)?;
        require_positive("course_id", course_id)?;
        self.write(
            functions::REMOVE_COURSE_FROM_STUDENT,
            vec![uint(student_id), uint(course_id)],
            Sender::Default,
            options,
        )
        .await
    }

    pub async fn clear_all_courses_for_student(
        &self,
        student_id: u64,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        require_positive("student_id", student_id)?;
        self.write(
            functions::CLEAR_ALL_COURSES_FOR_STUDENT,
            vec![uint(student_id)],
            Sender::Default,
            options,
        )
        .await
    }

    pub async fn batch_enroll(
        &self,
        student_ids: &[u64],
        course_id: u64,
        options: &TxOptions,
    ) -> Result<TxOutcome> {
        if student_ids.is_empty() {
            return Err(UniversityError::validation("student_ids must not be empty"));
        }
        for student_id in student_ids {
            require_positive("student_id", *student_id)?;
        }
        require_positive("course_id", course_id)?;

        self.write(
            functions::BATCH_ENROLL,
            vec![uint_array(student_ids), uint(course_id)],
            Sender::Default,
            options,
        )
        .await
    }

    pub async fn get_student_enrollments(&self, student_id: u64) -> Result<Vec<Enrollment>> {
        require_positive("student_id", student_id)?;

        Ok(self
            .read_list(
                functions::GET_STUDENT_ENROLLMENTS,
                vec![uint(student_id)],
                |values| {
                    let course_ids = as_u64_list(field(values, 0)?)?;
                    let course_names = as_string_list(field(values, 1)?)?;
                    let professors = as_string_list(field(values, 2)?)?;
                    let departments = as_string_list(field(values, 3)?)?;

                    Ok(course_ids
                        .into_iter()
                        .zip(course_names)
                        .zip(professors)
                        .zip(departments)
                        .map(|(((course_id, course_name), professor), department)| Enrollment {
                            course_id,
                            course_name,
                            professor,
                            department,
                        })
                        .collect())
                },
            )
            .await)
    }

    pub async fn get_enrolled_students(&self, course_id: u64) -> Result<Vec<u64>> {
        require_positive("course_id", course_id)?;
        Ok(self
            .read_ids(functions::GET_ENROLLED_STUDENTS, vec![uint(course_id)])
            .await)
    }

    /// Calls `callback` for every `StudentEnrolled` event mined after this call.
    pub async fn watch_enrollments<F>(
        &self,
        poll_interval: Duration,
        callback: F,
    ) -> Result<WatchHandle>
    where
        F: Fn(EnrollmentEvent) + Send + Sync + 'static,
    {
        let contract = self.university().await?;
        let watcher = EventWatcher::new(&contract, events::STUDENT_ENROLLED, poll_interval)?;

        watcher
            .spawn(move |log| {
                match enrollment_ids(&log.indexed) {
                    Ok((student_id, course_id)) => callback(EnrollmentEvent {
                        student_id,
                        course_id,
                        block_number: log.block_number,
                        observed_at: Utc::now(),
                    }),
                    Err(e) => warn!("⚠️ Malformed StudentEnrolled event: {}", e),
                }
            })
            .await
            .map_err(|e| UniversityError::Rpc(format!("failed to start enrollment watcher: {}", e)))
    }
}

fn require_positive(name: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(UniversityError::validation(format!("{} must be positive", name)));
    }
    Ok(())
}

fn require_text(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(UniversityError::validation(format!("{} must not be empty", name)));
    }
    Ok(())
}

fn enrollment_ids(indexed: &[DynSolValue]) -> Result<(u64, u64)> {
    Ok((as_u64(field(indexed, 0)?)?, as_u64(field(indexed, 1)?)?))
}

/// Decoding a single-entity result; shape mismatches surface as read errors.
fn decode_record<T>(function: &str, decode: impl FnOnce() -> Result<T>) -> Result<T> {
    decode().map_err(|e| match e {
        UniversityError::Abi(reason) => UniversityError::Read {
            function: function.to_string(),
            reason,
        },
        other => other,
    })
}
