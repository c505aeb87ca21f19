//! Faculty and program catalog
//!
//! Static option lists for the settings selectors. `program` values are only
//! meaningful relative to the faculty they were chosen under, which is why
//! lookups are keyed by faculty rather than flattened.

pub const FACULTY_ARTS: &str = "Arts";
pub const FACULTY_ENGINEERING: &str = "Engineering";
pub const FACULTY_ENVIRONMENT: &str = "Environment";
pub const FACULTY_HEALTH: &str = "Health";
pub const FACULTY_MATHEMATICS: &str = "Mathematics";
pub const FACULTY_SCIENCE: &str = "Science";
pub const FACULTY_ACCOUNTING_FINANCE: &str = "School of Accounting and Finance";

/// All faculties, in display order.
pub fn faculties() -> &'static [&'static str] {
    &[
        FACULTY_ARTS,
        FACULTY_ENGINEERING,
        FACULTY_ENVIRONMENT,
        FACULTY_HEALTH,
        FACULTY_MATHEMATICS,
        FACULTY_SCIENCE,
        FACULTY_ACCOUNTING_FINANCE,
    ]
}

/// Program options for a faculty, or `None` for an unknown faculty.
pub fn programs_for(faculty: &str) -> Option<&'static [&'static str]> {
    match faculty {
        FACULTY_ARTS => Some(&[
            "Accounting and Financial Management",
            "Anthropology",
            "Classical Studies",
            "Communication Studies",
            "Economics",
            "English",
            "Fine Arts",
            "French",
            "Gender and Social Justice",
            "Global Business and Digital Arts",
            "History",
            "Honours Arts",
            "Honours Arts and Business",
            "Legal Studies",
            "Liberal Studies",
            "Medieval Studies",
            "Music",
            "Peace and Conflict Studies",
            "Philosophy",
            "Political Science",
            "Psychology",
            "Religion, Culture, and Spirituality",
            "Sexualities, Relationships, and Families",
            "Social Development Studies",
            "Social Development Studies and Bachelor of Social Work Double Degree",
            "Social Work",
            "Sociology",
            "Theatre and Performance",
        ]),
        FACULTY_ENGINEERING => Some(&[
            "Architectural Engineering",
            "Architecture",
            "Biomedical Engineering",
            "Chemical Engineering",
            "Civil Engineering",
            "Computer Engineering",
            "Electrical Engineering",
            "Environmental Engineering",
            "Geological Engineering",
            "Management Engineering",
            "Mechanical Engineering",
            "Mechatronics Engineering",
            "Nanotechnology Engineering",
            "Software Engineering",
            "Systems Design Engineering",
        ]),
        FACULTY_ENVIRONMENT => Some(&[
            "Climate and Environmental Change",
            "Environment and Business",
            "Environment, Resources and Sustainability",
            "Geography and Aviation",
            "Geography and Environmental Management",
            "Geomatics",
            "Planning",
            "Sustainability and Financial Management",
        ]),
        FACULTY_HEALTH => Some(&[
            "Health Sciences",
            "Kinesiology",
            "Public Health",
            "Recreation and Leisure Studies",
            "Recreation, Leadership, and Health",
            "Sport and Recreation Management",
            "Therapeutic Recreation",
        ]),
        FACULTY_MATHEMATICS => Some(&[
            "Actuarial Science",
            "Applied Mathematics",
            "Applied Mathematics with Scientific Computing and Scientific Machine Learning",
            "Biostatistics",
            "Business Administration (Laurier) and Computer Science (Waterloo) Double Degree",
            "Business Administration (Laurier) and Mathematics (Waterloo) Double Degree",
            "Combinatorics and Optimization",
            "Computational Mathematics",
            "Computer Science",
            "Computing and Financial Management",
            "Data Science",
            "Information Technology Management",
            "Mathematical Economics",
            "Mathematical Finance",
            "Mathematical Optimization",
            "Mathematical Physics",
            "Mathematical Studies",
            "Mathematics",
            "Mathematics/Business Administration",
            "Mathematics/Chartered Professional Accountancy",
            "Mathematics/Financial Analysis and Risk Management",
            "Mathematics Teaching",
            "Pure Mathematics",
            "Software Engineering",
            "Statistics",
        ]),
        FACULTY_SCIENCE => Some(&[
            "Environmental Sciences",
            "Honours Science",
            "Life Sciences",
            "Biochemistry",
            "Biology",
            "Biomedical Sciences",
            "Psychology",
            "Medical Sciences (Waterloo) and Doctor of Medicine (St. George's University)",
            "Physical Sciences",
            "Biological and Medical Physics",
            "Chemistry",
            "Earth Sciences",
            "Materials and Nanosciences",
            "Mathematical Physics",
            "Medicinal Chemistry",
            "Physics",
            "Physics and Astronomy",
            "Optometry",
            "Pharmacy",
            "Science and Aviation",
            "Science and Business",
            "Science and Financial Management",
        ]),
        FACULTY_ACCOUNTING_FINANCE => Some(&[
            "Accounting and Financial Management",
            "Science and Financial Management",
            "Sustainability and Financial Management",
        ]),
        _ => None,
    }
}

/// Graduation-year options offered by the settings picker: the current
/// year through the horizon.
pub fn grad_year_options(current_year: i32) -> Vec<i32> {
    (current_year..=current_year + crate::constants::GRAD_YEAR_HORIZON).collect()
}
