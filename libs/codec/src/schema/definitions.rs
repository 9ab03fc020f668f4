//! Schema table for the MQ structures
//!
//! Field order, widths and defaults follow the queue manager's C headers
//! (`cmqc.h`). Field names are the snake-case forms of the C member names.

use super::{FieldDef, SchemaEntry, TrailerKind};
use mq_types::constants::*;
use mq_types::{FormatMarker, HeaderType};

/// MQMD version 1 members after StrucId and Version
fn descriptor_v1_body() -> Vec<FieldDef> {
    vec![
        FieldDef::long("report", 0),
        FieldDef::long("msg_type", MQMT_DATAGRAM),
        FieldDef::long("expiry", MQEI_UNLIMITED),
        FieldDef::long("feedback", 0),
        FieldDef::long("encoding", MQENC_NATIVE),
        FieldDef::long("coded_char_set_id", MQCCSI_Q_MGR),
        FieldDef::chars("format", 8),
        FieldDef::long("priority", MQPRI_PRIORITY_AS_Q_DEF),
        FieldDef::long("persistence", MQPER_PERSISTENCE_AS_Q_DEF),
        FieldDef::bytes("msg_id", 24),
        FieldDef::bytes("correl_id", 24),
        FieldDef::long("backout_count", 0),
        FieldDef::chars("reply_to_q", 48),
        FieldDef::chars("reply_to_q_mgr", 48),
        FieldDef::chars("user_identifier", 12),
        FieldDef::bytes("accounting_token", 32),
        FieldDef::chars("appl_identity_data", 32),
        FieldDef::long("put_appl_type", MQAT_NO_CONTEXT),
        FieldDef::chars("put_appl_name", 28),
        FieldDef::chars("put_date", 8),
        FieldDef::chars("put_time", 8),
        FieldDef::chars("appl_origin_data", 4),
    ]
}

fn message_descriptor() -> Vec<FieldDef> {
    let mut fields = vec![FieldDef::struc_id("MD  "), FieldDef::version(2)];
    fields.extend(descriptor_v1_body());
    fields.extend([
        FieldDef::bytes("group_id", 24),
        FieldDef::long("msg_seq_number", 1),
        FieldDef::long("offset", 0),
        FieldDef::long("msg_flags", 0),
        FieldDef::long("original_length", MQOL_UNDEFINED),
    ]);
    fields
}

fn dead_letter_header() -> Vec<FieldDef> {
    vec![
        FieldDef::struc_id("DLH "),
        FieldDef::version(1),
        FieldDef::long("reason", MQRC_NONE),
        FieldDef::chars("dest_q_name", 48),
        FieldDef::chars("dest_q_mgr_name", 48),
        FieldDef::long("encoding", MQENC_NATIVE),
        FieldDef::long("coded_char_set_id", MQCCSI_UNDEFINED),
        FieldDef::chars("format", 8),
        FieldDef::long("put_appl_type", MQAT_NO_CONTEXT),
        FieldDef::chars("put_appl_name", 28),
        FieldDef::chars("put_date", 8),
        FieldDef::chars("put_time", 8),
    ]
}

fn dist_header() -> Vec<FieldDef> {
    vec![
        FieldDef::struc_id("DH  "),
        FieldDef::version(1),
        FieldDef::struc_length(),
        FieldDef::long("encoding", 0),
        FieldDef::long("coded_char_set_id", MQCCSI_UNDEFINED),
        FieldDef::chars("format", 8),
        FieldDef::long("flags", 0),
        FieldDef::long("put_msg_rec_fields", 0),
        FieldDef::long("recs_present", 0),
        FieldDef::long("object_rec_offset", 0),
        FieldDef::long("put_msg_rec_offset", 0),
        FieldDef::trailer("records", TrailerKind::Raw),
    ]
}

fn cics() -> Vec<FieldDef> {
    vec![
        FieldDef::struc_id("CIH "),
        FieldDef::version(2),
        FieldDef::struc_length(),
        FieldDef::long("encoding", 0),
        FieldDef::long("coded_char_set_id", MQCCSI_UNDEFINED),
        FieldDef::chars("format", 8),
        FieldDef::long("flags", 0),
        FieldDef::long("return_code", 0),
        FieldDef::long("comp_code", 0),
        FieldDef::long("reason", MQRC_NONE),
        FieldDef::long("uow_control", MQCUOWC_ONLY),
        FieldDef::long("get_wait_interval", MQCGWI_DEFAULT),
        FieldDef::long("link_type", MQCLT_PROGRAM),
        FieldDef::long("output_data_length", MQCODL_AS_INPUT),
        FieldDef::long("facility_keep_time", 0),
        FieldDef::long("ads_descriptor", 0),
        FieldDef::long("conversational_task", 0),
        FieldDef::long("task_end_status", 0),
        FieldDef::bytes("facility", 8),
        FieldDef::chars("function", 4),
        FieldDef::chars("abend_code", 4),
        FieldDef::chars("authenticator", 8),
        FieldDef::chars("reserved1", 8),
        FieldDef::chars("reply_to_format", 8),
        FieldDef::chars("remote_sys_id", 4),
        FieldDef::chars("remote_trans_id", 4),
        FieldDef::chars("transaction_id", 4),
        FieldDef::chars("facility_like", 4),
        FieldDef::chars("attention_id", 4),
        FieldDef::chars("start_code", 4),
        FieldDef::chars("cancel_code", 4),
        FieldDef::chars("next_transaction_id", 4),
        FieldDef::chars("reserved2", 8),
        FieldDef::chars("reserved3", 8),
        FieldDef::long("cursor_position", 0),
        FieldDef::long("error_offset", 0),
        FieldDef::long("input_item", 0),
        FieldDef::long("reserved4", 0),
    ]
}

fn ims() -> Vec<FieldDef> {
    vec![
        FieldDef::struc_id("IIH "),
        FieldDef::version(1),
        FieldDef::struc_length(),
        FieldDef::long("encoding", 0),
        FieldDef::long("coded_char_set_id", MQCCSI_UNDEFINED),
        FieldDef::chars("format", 8),
        FieldDef::long("flags", 0),
        FieldDef::chars("l_term_override", 8),
        FieldDef::chars("mfs_map_name", 8),
        FieldDef::chars("reply_to_format", 8),
        FieldDef::chars("authenticator", 8),
        FieldDef::bytes("tran_instance_id", 16),
        FieldDef::chars("tran_state", 1),
        FieldDef::chars_with("commit_mode", 1, "0"),
        FieldDef::chars_with("security_scope", 1, "C"),
        FieldDef::chars("reserved", 1),
    ]
}

fn rf_header() -> Vec<FieldDef> {
    vec![
        FieldDef::struc_id("RFH "),
        FieldDef::version(1),
        FieldDef::struc_length(),
        FieldDef::long("encoding", MQENC_NATIVE),
        FieldDef::long("coded_char_set_id", MQCCSI_UNDEFINED),
        FieldDef::chars("format", 8),
        FieldDef::long("flags", 0),
        FieldDef::trailer("name_value", TrailerKind::NameValues),
    ]
}

fn rf_header_2() -> Vec<FieldDef> {
    vec![
        FieldDef::struc_id("RFH "),
        FieldDef::version(2),
        FieldDef::struc_length(),
        FieldDef::long("encoding", MQENC_NATIVE),
        FieldDef::long("coded_char_set_id", MQCCSI_UNDEFINED),
        FieldDef::chars("format", 8),
        FieldDef::long("flags", 0),
        FieldDef::long("name_value_ccsid", MQCCSI_UTF8),
        FieldDef::trailer("xml", TrailerKind::PaddedStrings),
    ]
}

fn ref_msg_header() -> Vec<FieldDef> {
    vec![
        FieldDef::struc_id("RMH "),
        FieldDef::version(1),
        FieldDef::struc_length(),
        FieldDef::long("encoding", 0),
        FieldDef::long("coded_char_set_id", MQCCSI_UNDEFINED),
        FieldDef::chars("format", 8),
        FieldDef::long("flags", 0),
        FieldDef::chars("object_type", 8),
        FieldDef::bytes("object_instance_id", 24),
        FieldDef::long("src_env_length", 0),
        FieldDef::long("src_env_offset", 0),
        FieldDef::long("src_name_length", 0),
        FieldDef::long("src_name_offset", 0),
        FieldDef::long("dest_env_length", 0),
        FieldDef::long("dest_env_offset", 0),
        FieldDef::long("dest_name_length", 0),
        FieldDef::long("dest_name_offset", 0),
        FieldDef::long("data_logical_length", 0),
        FieldDef::long("data_logical_offset", 0),
        FieldDef::long("data_logical_offset2", 0),
        FieldDef::trailer("env_data", TrailerKind::Raw),
    ]
}

fn trigger() -> Vec<FieldDef> {
    vec![
        FieldDef::struc_id("TM  "),
        FieldDef::version(1),
        FieldDef::chars("q_name", 48),
        FieldDef::chars("process_name", 48),
        FieldDef::chars("trigger_data", 64),
        FieldDef::long("appl_type", 0),
        FieldDef::chars("appl_id", 256),
        FieldDef::chars("env_data", 128),
        FieldDef::chars("user_data", 128),
    ]
}

fn trigger_character() -> Vec<FieldDef> {
    vec![
        FieldDef::struc_id("TMC "),
        FieldDef::constant(FieldDef::chars_with("version", 4, "   2")),
        FieldDef::chars("q_name", 48),
        FieldDef::chars("process_name", 48),
        FieldDef::chars("trigger_data", 64),
        FieldDef::chars("appl_type", 4),
        FieldDef::chars("appl_id", 256),
        FieldDef::chars("env_data", 128),
        FieldDef::chars("user_data", 128),
        FieldDef::chars("q_mgr_name", 48),
    ]
}

fn work_info_header() -> Vec<FieldDef> {
    vec![
        FieldDef::struc_id("WIH "),
        FieldDef::version(1),
        FieldDef::struc_length(),
        FieldDef::long("encoding", 0),
        FieldDef::long("coded_char_set_id", MQCCSI_UNDEFINED),
        FieldDef::chars("format", 8),
        FieldDef::long("flags", 0),
        FieldDef::chars("service_name", 32),
        FieldDef::chars("service_step", 8),
        FieldDef::bytes("msg_token", 16),
        FieldDef::chars("reserved", 32),
    ]
}

/// MQXQH with its embedded version 1 descriptor flattened in
fn xmit_q_header() -> Vec<FieldDef> {
    let mut fields = vec![
        FieldDef::struc_id("XQH "),
        FieldDef::version(1),
        FieldDef::chars("remote_q_name", 48),
        FieldDef::chars("remote_q_mgr_name", 48),
        FieldDef::constant(FieldDef::chars_with("md_struc_id", 4, "MD  ")),
        FieldDef::constant(FieldDef::long("md_version", 1)),
    ];
    fields.extend(descriptor_v1_body());
    fields
}

/// Every structure the codec knows, in header type order
pub static SCHEMA_TABLE: &[SchemaEntry] = &[
    SchemaEntry {
        header_type: HeaderType::MessageDescriptor,
        struct_name: "MQMD",
        fixed_size: 364,
        format: None,
        no_format: false,
        overrides: &[],
        fields: message_descriptor,
    },
    SchemaEntry {
        header_type: HeaderType::DeadLetterHeader,
        struct_name: "MQDLH",
        fixed_size: 172,
        format: Some(FormatMarker::DEAD_LETTER_HEADER),
        no_format: false,
        overrides: &[("coded_char_set_id", MQCCSI_INHERIT)],
        fields: dead_letter_header,
    },
    SchemaEntry {
        header_type: HeaderType::DistHeader,
        struct_name: "MQDH",
        fixed_size: 48,
        format: Some(FormatMarker::DIST_HEADER),
        no_format: false,
        overrides: &[],
        fields: dist_header,
    },
    SchemaEntry {
        header_type: HeaderType::Cics,
        struct_name: "MQCIH",
        fixed_size: 180,
        format: Some(FormatMarker::CICS),
        no_format: false,
        overrides: &[],
        fields: cics,
    },
    SchemaEntry {
        header_type: HeaderType::Ims,
        struct_name: "MQIIH",
        fixed_size: 84,
        format: Some(FormatMarker::IMS),
        no_format: false,
        overrides: &[],
        fields: ims,
    },
    SchemaEntry {
        header_type: HeaderType::RfHeader,
        struct_name: "MQRFH",
        fixed_size: 32,
        format: Some(FormatMarker::RF_HEADER),
        no_format: false,
        overrides: &[("coded_char_set_id", MQCCSI_INHERIT)],
        fields: rf_header,
    },
    SchemaEntry {
        header_type: HeaderType::RfHeader2,
        struct_name: "MQRFH2",
        fixed_size: 36,
        format: Some(FormatMarker::RF_HEADER_2),
        no_format: false,
        overrides: &[("coded_char_set_id", MQCCSI_INHERIT)],
        fields: rf_header_2,
    },
    SchemaEntry {
        header_type: HeaderType::RefMsgHeader,
        struct_name: "MQRMH",
        fixed_size: 108,
        format: Some(FormatMarker::REF_MSG_HEADER),
        no_format: false,
        overrides: &[],
        fields: ref_msg_header,
    },
    SchemaEntry {
        header_type: HeaderType::Trigger,
        struct_name: "MQTM",
        fixed_size: 684,
        format: Some(FormatMarker::TRIGGER),
        no_format: true,
        overrides: &[],
        fields: trigger,
    },
    SchemaEntry {
        header_type: HeaderType::TriggerCharacter,
        struct_name: "MQTMC2",
        fixed_size: 732,
        format: None,
        no_format: false,
        overrides: &[],
        fields: trigger_character,
    },
    SchemaEntry {
        header_type: HeaderType::WorkInfoHeader,
        struct_name: "MQWIH",
        fixed_size: 120,
        format: Some(FormatMarker::WORK_INFO_HEADER),
        no_format: false,
        overrides: &[],
        fields: work_info_header,
    },
    SchemaEntry {
        header_type: HeaderType::XmitQHeader,
        struct_name: "MQXQH",
        fixed_size: 428,
        format: Some(FormatMarker::XMIT_Q_HEADER),
        no_format: true,
        overrides: &[],
        fields: xmit_q_header,
    },
];
