//! Names of the University contract entry points this crate drives.
//!
//! Parameter order and count come from the ABI artifact on disk; these are
//! only the lookup keys.

pub mod functions {
    pub const ADD_STUDENT: &str = "addStudent";
    pub const GET_STUDENT: &str = "getStudent";
    pub const UPDATE_STUDENT: &str = "updateStudent";
    pub const DELETE_STUDENT: &str = "deleteStudent";
    pub const GET_ALL_STUDENTS: &str = "getAllStudents";

    pub const ADD_PROFESSOR: &str = "addProfessor";
    pub const GET_PROFESSOR: &str = "getProfessor";
    pub const DELETE_PROFESSOR: &str = "deleteProfessor";
    pub const GET_ALL_PROFESSORS: &str = "getAllProfessors";
    pub const AUTHORIZE_INSTRUCTOR: &str = "authorizeInstructor";

    pub const CREATE_COURSE: &str = "createCourse";
    pub const GET_COURSE: &str = "getCourse";
    pub const REASSIGN_COURSE: &str = "reassignCourse";
    pub const DELETE_COURSE: &str = "deleteCourse";
    pub const GET_ALL_COURSES: &str = "getAllCourses";
    pub const GET_COURSES_BY_PROFESSOR: &str = "getCoursesByProfessor";

    pub const ENROLL_STUDENT_IN_COURSE: &str = "enrollStudentInCourse";
    pub const REMOVE_COURSE_FROM_STUDENT: &str = "removeCourseFromStudent";
    pub const CLEAR_ALL_COURSES_FOR_STUDENT: &str = "clearAllCoursesForStudent";
    pub const BATCH_ENROLL: &str = "batchEnroll";
    pub const GET_STUDENT_ENROLLMENTS: &str = "getStudentEnrollments";
    pub const GET_ENROLLED_STUDENTS: &str = "getEnrolledStudents";
}

pub mod events {
    pub const STUDENT_ENROLLED: &str = "StudentEnrolled";
}
