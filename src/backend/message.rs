use crate::error::Error;
use std::fmt;
use trust_dns_proto::rr::RecordType;

/// Name this backend announces in the handshake.
pub const BACKEND_NAME: &str = "DDNS Crab Backend";

/// TTL of every `DATA` answer, in seconds.
pub const ANSWER_TTL: u32 = 10;

const QUERY_FIELDS: usize = 6;

/// A `Q` request line: `Q\t<qname>\t<qclass>\t<qtype>\t<id>\t<remote-ip>`.
///
/// The leading tag and the remote address aren't used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query<'a> {
    pub name: &'a str,
    pub class: &'a str,
    pub qtype: &'a str,
    pub id: &'a str,
}

impl<'a> Query<'a> {
    /// Parse a request line, without its line terminator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLine`] unless the line has exactly six tab separated fields.
    pub fn parse(line: &'a str) -> Result<Self, Error> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != QUERY_FIELDS {
            return Err(Error::InvalidLine(fields.len()));
        }
        Ok(Query {
            name: fields[1],
            class: fields[2],
            qtype: fields[3],
            id: fields[4],
        })
    }
}

/// Record data produced for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub rtype: RecordType,
    pub content: String,
}

/// One line written back to the DNS server.
#[derive(Debug)]
pub enum Response<'a> {
    Handshake,
    Data(&'a Query<'a>, &'a Answer),
    Log(&'a str),
    End,
    Fail,
}

impl fmt::Display for Response<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Handshake => write!(f, "OK\t{BACKEND_NAME}"),
            Response::Data(query, answer) => write!(
                f,
                "DATA\t{}\t{}\t{}\t{ANSWER_TTL}\t{}\t{}",
                query.name, query.class, answer.rtype, query.id, answer.content
            ),
            // Keep log messages on a single protocol line.
            Response::Log(msg) => write!(f, "LOG\t'{}'", msg.replace(['\r', '\n'], " ")),
            Response::End => f.write_str("END"),
            Response::Fail => f.write_str("FAIL"),
        }
    }
}
