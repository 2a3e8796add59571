use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_teachers_table::Migration),
            Box::new(m20250301_000002_create_subjects_tables::Migration),
            Box::new(m20250301_000003_create_timetable_table::Migration),
            Box::new(m20250301_000004_create_attendance_table::Migration),
            Box::new(m20250301_000005_create_payroll_table::Migration),
            Box::new(m20250301_000006_create_payment_transactions_table::Migration),
            Box::new(m20250301_000007_create_payment_schedules_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250301_000001_create_teachers_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_teachers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Teachers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Teachers::TeacherId)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Teachers::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Teachers::Phone).string_len(20).not_null())
                        .col(ColumnDef::new(Teachers::Email).string_len(100).null())
                        .col(ColumnDef::new(Teachers::TeachingAllowance).integer().null())
                        .col(
                            ColumnDef::new(Teachers::TransportAllowance)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Teachers::Status)
                                .string_len(20)
                                .not_null()
                                .default("active"),
                        )
                        .col(ColumnDef::new(Teachers::DateJoined).date().not_null())
                        .col(ColumnDef::new(Teachers::Notes).text().null())
                        .col(
                            ColumnDef::new(Teachers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_teachers_status")
                        .table(Teachers::Table)
                        .col(Teachers::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Teachers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Teachers {
        Table,
        TeacherId,
        Name,
        Phone,
        Email,
        TeachingAllowance,
        TransportAllowance,
        Status,
        DateJoined,
        Notes,
        CreatedAt,
    }
}

mod m20250301_000002_create_subjects_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_subjects_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Subjects::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Subjects::SubjectId)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Subjects::SubjectName)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Subjects::Description).text().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TeacherSubjects::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TeacherSubjects::LinkId)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TeacherSubjects::TeacherId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TeacherSubjects::SubjectId)
                                .integer()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_teacher_subjects_teacher_subject")
                        .table(TeacherSubjects::Table)
                        .col(TeacherSubjects::TeacherId)
                        .col(TeacherSubjects::SubjectId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            // Default subject catalogue, matching the institution's curriculum
            let insert = Query::insert()
                .into_table(Subjects::Table)
                .columns([Subjects::SubjectName])
                .values_panic(["Mathematics".into()])
                .values_panic(["Physics".into()])
                .values_panic(["Chemistry".into()])
                .values_panic(["English".into()])
                .values_panic(["Chichewa".into()])
                .values_panic(["Geography".into()])
                .values_panic(["Biology".into()])
                .to_owned();
            manager.exec_stmt(insert).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TeacherSubjects::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Subjects::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Subjects {
        Table,
        SubjectId,
        SubjectName,
        Description,
    }

    #[derive(DeriveIden)]
    pub enum TeacherSubjects {
        Table,
        LinkId,
        TeacherId,
        SubjectId,
    }
}

mod m20250301_000003_create_timetable_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_timetable_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Timetable::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Timetable::EntryId)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Timetable::DayOfWeek).small_integer().not_null())
                        .col(ColumnDef::new(Timetable::StartTime).time().not_null())
                        .col(ColumnDef::new(Timetable::EndTime).time().not_null())
                        .col(ColumnDef::new(Timetable::SubjectId).integer().null())
                        .col(ColumnDef::new(Timetable::TeacherId).integer().null())
                        .col(
                            ColumnDef::new(Timetable::IsBreak)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Timetable::WeekNumber).integer().not_null())
                        .col(ColumnDef::new(Timetable::AcademicYear).integer().not_null())
                        .to_owned(),
                )
                .await?;

            // One slot per (day, start, week, year)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_timetable_slot")
                        .table(Timetable::Table)
                        .col(Timetable::DayOfWeek)
                        .col(Timetable::StartTime)
                        .col(Timetable::WeekNumber)
                        .col(Timetable::AcademicYear)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_timetable_week_year")
                        .table(Timetable::Table)
                        .col(Timetable::WeekNumber)
                        .col(Timetable::AcademicYear)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Timetable::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Timetable {
        Table,
        EntryId,
        DayOfWeek,
        StartTime,
        EndTime,
        SubjectId,
        TeacherId,
        IsBreak,
        WeekNumber,
        AcademicYear,
    }
}

mod m20250301_000004_create_attendance_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_attendance_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Attendance::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Attendance::AttendanceId)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Attendance::TeacherId).integer().not_null())
                        .col(
                            ColumnDef::new(Attendance::TimetableEntryId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(Attendance::AttendanceDate).date().not_null())
                        .col(ColumnDef::new(Attendance::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Attendance::Notes).text().null())
                        .col(ColumnDef::new(Attendance::WeekNumber).integer().not_null())
                        .col(
                            ColumnDef::new(Attendance::AcademicYear)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Attendance::RecordedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_attendance_week_year")
                        .table(Attendance::Table)
                        .col(Attendance::WeekNumber)
                        .col(Attendance::AcademicYear)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_attendance_teacher")
                        .table(Attendance::Table)
                        .col(Attendance::TeacherId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Attendance::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Attendance {
        Table,
        AttendanceId,
        TeacherId,
        TimetableEntryId,
        AttendanceDate,
        Status,
        Notes,
        WeekNumber,
        AcademicYear,
        RecordedAt,
    }
}

mod m20250301_000005_create_payroll_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000005_create_payroll_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PayrollWeekly::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PayrollWeekly::PayrollId)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollWeekly::TeacherId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollWeekly::WeekNumber)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollWeekly::AcademicYear)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollWeekly::TeachingAllowance)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PayrollWeekly::TransportAllowance)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PayrollWeekly::Bonus)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PayrollWeekly::Deduction)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PayrollWeekly::TotalAmount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PayrollWeekly::PaymentStatus)
                                .string_len(20)
                                .not_null()
                                .default("pending"),
                        )
                        .col(ColumnDef::new(PayrollWeekly::PaymentDate).date().null())
                        .col(
                            ColumnDef::new(PayrollWeekly::ProcessedDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            // The reconciler's idempotency depends on this constraint being
            // store-enforced: at most one payroll row per (teacher, week, year).
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payroll_weekly_teacher_week_year")
                        .table(PayrollWeekly::Table)
                        .col(PayrollWeekly::TeacherId)
                        .col(PayrollWeekly::WeekNumber)
                        .col(PayrollWeekly::AcademicYear)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payroll_weekly_week_year")
                        .table(PayrollWeekly::Table)
                        .col(PayrollWeekly::WeekNumber)
                        .col(PayrollWeekly::AcademicYear)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PayrollWeekly::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum PayrollWeekly {
        Table,
        PayrollId,
        TeacherId,
        WeekNumber,
        AcademicYear,
        TeachingAllowance,
        TransportAllowance,
        Bonus,
        Deduction,
        TotalAmount,
        PaymentStatus,
        PaymentDate,
        ProcessedDate,
    }
}

mod m20250301_000006_create_payment_transactions_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000006_create_payment_transactions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PaymentTransactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PaymentTransactions::TransactionId)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentTransactions::TeacherId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentTransactions::Amount)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentTransactions::PaymentType)
                                .string_len(30)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentTransactions::PaymentDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentTransactions::ScheduledDay)
                                .small_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentTransactions::ReferenceNumber)
                                .string_len(64)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PaymentTransactions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payment_transactions_teacher")
                        .table(PaymentTransactions::Table)
                        .col(PaymentTransactions::TeacherId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PaymentTransactions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum PaymentTransactions {
        Table,
        TransactionId,
        TeacherId,
        Amount,
        PaymentType,
        PaymentDate,
        ScheduledDay,
        ReferenceNumber,
        CreatedAt,
    }
}

mod m20250301_000007_create_payment_schedules_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000007_create_payment_schedules_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PaymentSchedules::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PaymentSchedules::ScheduleId)
                                .integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentSchedules::PaymentType)
                                .string_len(20)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PaymentSchedules::ScheduledDay)
                                .small_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentSchedules::DefaultAmount)
                                .integer()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Defaults carried over from the original schema: transport pays
            // on Sundays (day 0), teaching on Fridays (day 5).
            let insert = Query::insert()
                .into_table(PaymentSchedules::Table)
                .columns([
                    PaymentSchedules::PaymentType,
                    PaymentSchedules::ScheduledDay,
                    PaymentSchedules::DefaultAmount,
                ])
                .values_panic(["transport".into(), 0i16.into(), 12000.into()])
                .values_panic(["teaching".into(), 5i16.into(), 20000.into()])
                .to_owned();
            manager.exec_stmt(insert).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PaymentSchedules::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum PaymentSchedules {
        Table,
        ScheduleId,
        PaymentType,
        ScheduledDay,
        DefaultAmount,
    }
}
