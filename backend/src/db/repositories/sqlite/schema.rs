diesel::table! {
    #[sql_name = "Incidents"]
    incidents (case_number) {
        case_number -> Text,
        date_time -> Text,
        code -> BigInt,
        incident -> Text,
        police_grid -> BigInt,
        neighborhood_number -> BigInt,
        block -> Text,
    }
}
