// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Implementation of reading and writing of DNS messages.
//!
//! A [`Message`] is decoded from a datagram with [`Message::from_wire`]
//! and encoded with [`Message::to_wire`]. The building blocks, a
//! [`Cursor`] over the message octets, the [`Header`], and the
//! [`Question`] and [`ResourceRecord`] codecs, are public as well for
//! callers that need finer control.

mod constants;
mod cursor;
mod error;
mod header;
mod opcode;
mod question;
mod rcode;

use std::fmt;

pub use constants::HEADER_SIZE;
pub use cursor::Cursor;
pub use error::{EncodeError, Error, Result};
pub use header::Header;
pub use opcode::{IntoOpcodeError, Opcode};
pub use question::Question;
pub use rcode::{IntoRcodeError, Rcode};

use crate::rr::ResourceRecord;
use constants::{MIN_QUESTION_SIZE, MIN_RR_SIZE};

////////////////////////////////////////////////////////////////////////
// MESSAGES                                                           //
////////////////////////////////////////////////////////////////////////

/// A complete DNS message.
///
/// The section counts in [`Message::header`] are what was received
/// when the message was decoded. They are ignored when the message is
/// encoded: the lengths of the section vectors are written instead.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
}

impl Message {
    /// Creates a message with the given header and empty sections.
    pub fn new(header: Header) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    /// Starts a response to `request`: the header is
    /// [`Header::response`] of the request's header, and the questions
    /// are copied.
    pub fn response_to(request: &Message) -> Self {
        Self {
            header: request.header.response(),
            questions: request.questions.clone(),
            ..Self::default()
        }
    }

    /// Creates a standard query for `question` with a random ID.
    pub fn new_query(question: Question, rd: bool) -> Self {
        let header = Header {
            id: rand::random(),
            rd,
            ..Header::default()
        };
        Self {
            header,
            questions: vec![question],
            ..Self::default()
        }
    }

    /// Decodes a message.
    ///
    /// Sections are read in order, each entry as many times as the
    /// header's count for its section says. Octets left over after the
    /// last entry are ignored. This fails if the header counts more
    /// entries than could possibly fit in the rest of the message, or if
    /// any entry is malformed.
    pub fn from_wire(octets: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(octets);
        let header = Header::read(&mut cursor)?;

        let rr_count = header.ancount as usize + header.nscount as usize + header.arcount as usize;
        let min_size = header.qdcount as usize * MIN_QUESTION_SIZE + rr_count * MIN_RR_SIZE;
        if min_size > cursor.remaining() {
            return Err(Error::CountExceedsMessage);
        }

        let questions = (0..header.qdcount)
            .map(|_| Question::read(&mut cursor))
            .collect::<Result<_>>()?;
        let answers = read_records(&mut cursor, header.ancount)?;
        let authorities = read_records(&mut cursor, header.nscount)?;
        let additionals = read_records(&mut cursor, header.arcount)?;

        Ok(Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }

    /// Encodes the message. Names are written without compression.
    pub fn to_wire(&self) -> std::result::Result<Vec<u8>, EncodeError> {
        let count = |len: usize| u16::try_from(len).map_err(|_| EncodeError::TooManyEntries);
        let header = Header {
            qdcount: count(self.questions.len())?,
            ancount: count(self.answers.len())?,
            nscount: count(self.authorities.len())?,
            arcount: count(self.additionals.len())?,
            ..self.header
        };

        let mut buf = Vec::with_capacity(512);
        header.write(&mut buf);
        for question in &self.questions {
            question.write(&mut buf);
        }
        for record in self.records() {
            record.write(&mut buf)?;
        }
        Ok(buf)
    }

    /// Iterates over the records of the answer, authority, and additional
    /// sections, in that order.
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.additionals.iter())
    }
}

fn read_records(cursor: &mut Cursor, count: u16) -> Result<Vec<ResourceRecord>> {
    (0..count).map(|_| ResourceRecord::read(cursor)).collect()
}

/// Formats the message much like `dig` does.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let header = &self.header;
        writeln!(
            f,
            ";; ->>HEADER<<- opcode: {}, status: {}, id: {}",
            header.opcode, header.rcode, header.id
        )?;
        f.write_str(";; flags:")?;
        for (set, flag) in [
            (!header.is_query, "qr"),
            (header.aa, "aa"),
            (header.tc, "tc"),
            (header.rd, "rd"),
            (header.ra, "ra"),
        ] {
            if set {
                write!(f, " {}", flag)?;
            }
        }
        writeln!(
            f,
            "; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
            self.questions.len(),
            self.answers.len(),
            self.authorities.len(),
            self.additionals.len()
        )?;

        if !self.questions.is_empty() {
            f.write_str("\n;; QUESTION SECTION:\n")?;
            for question in &self.questions {
                writeln!(f, "{}", question)?;
            }
        }
        for (title, records) in [
            ("ANSWER", &self.answers),
            ("AUTHORITY", &self.authorities),
            ("ADDITIONAL", &self.additionals),
        ] {
            if !records.is_empty() {
                write!(f, "\n;; {} SECTION:\n", title)?;
                for record in records {
                    writeln!(f, "{}", record)?;
                }
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::Class;
    use crate::name::{self, Name};
    use crate::rr::{Rdata, Ttl, Type};

    // The response to an NS query for example.com., as sent by one of
    // its name servers. The second NS record compresses its target
    // against the first.
    const EXAMPLE_COM_NS_MESSAGE: &[u8] =
        b"\xe2\xd7\x81\x80\x00\x01\x00\x02\x00\x00\x00\x01\x07\x65\x78\x61\
          \x6d\x70\x6c\x65\x03\x63\x6f\x6d\x00\x00\x02\x00\x01\xc0\x0c\x00\
          \x02\x00\x01\x00\x01\x50\xa2\x00\x14\x01\x61\x0c\x69\x61\x6e\x61\
          \x2d\x73\x65\x72\x76\x65\x72\x73\x03\x6e\x65\x74\x00\xc0\x0c\x00\
          \x02\x00\x01\x00\x01\x50\xa2\x00\x04\x01\x62\xc0\x2b\x00\x00\x29\
          \x10\x00\x00\x00\x00\x00\x00\x00";

    fn example_com() -> Name {
        "example.com.".parse().unwrap()
    }

    fn ns_record(target: &str) -> ResourceRecord {
        ResourceRecord {
            owner: example_com(),
            rr_type: Type::NS,
            class: Class::IN,
            ttl: Ttl::from(86178),
            rdata: Rdata::Ns(target.parse().unwrap()),
        }
    }

    #[test]
    fn from_wire_works() {
        let message = Message::from_wire(EXAMPLE_COM_NS_MESSAGE).unwrap();
        assert_eq!(message.header.id, 0xe2d7);
        assert!(!message.header.is_query);
        assert!(message.header.rd && message.header.ra);
        assert_eq!(message.header.rcode, Rcode::NoError);
        assert_eq!(
            message.questions,
            [Question {
                qname: example_com(),
                qtype: Type::NS,
                qclass: Class::IN,
            }]
        );
        assert_eq!(
            message.answers,
            [ns_record("a.iana-servers.net."), ns_record("b.iana-servers.net.")]
        );
        assert!(message.authorities.is_empty());
        assert_eq!(
            message.additionals,
            [ResourceRecord {
                owner: Name::root(),
                rr_type: Type::OPT,
                class: Class::from(4096),
                ttl: Ttl::from(0),
                rdata: Rdata::Opaque(Vec::new().into()),
            }]
        );
    }

    #[test]
    fn to_wire_expands_compressed_names() {
        let message = Message::from_wire(EXAMPLE_COM_NS_MESSAGE).unwrap();
        let wire = message.to_wire().unwrap();
        // Two owners grow by eleven octets each and the second NS
        // target by sixteen.
        assert_eq!(wire.len(), EXAMPLE_COM_NS_MESSAGE.len() + 38);
        assert_eq!(&wire[..HEADER_SIZE], &EXAMPLE_COM_NS_MESSAGE[..HEADER_SIZE]);
        assert_eq!(&wire[29..42], b"\x07example\x03com\x00");
        assert_eq!(Message::from_wire(&wire), Ok(message));
    }

    #[test]
    fn to_wire_takes_counts_from_sections() {
        let mut message = Message::new(Header {
            id: 9,
            qdcount: 7,
            ancount: 7,
            ..Header::default()
        });
        message.answers.push(ns_record("ns.example.com."));
        let wire = message.to_wire().unwrap();
        assert_eq!(&wire[4..HEADER_SIZE], b"\x00\x00\x00\x01\x00\x00\x00\x00");

        let decoded = Message::from_wire(&wire).unwrap();
        assert_eq!(decoded.header.ancount, 1);
        assert_eq!(decoded.answers, message.answers);
    }

    #[test]
    fn to_wire_rejects_oversized_sections() {
        let mut message = Message::default();
        let question = Question {
            qname: Name::root(),
            qtype: Type::A,
            qclass: Class::IN,
        };
        message.questions = vec![question; 65536];
        assert_eq!(message.to_wire(), Err(EncodeError::TooManyEntries));
    }

    #[test]
    fn from_wire_rejects_short_message() {
        assert_eq!(
            Message::from_wire(&EXAMPLE_COM_NS_MESSAGE[..11]),
            Err(Error::HeaderTooShort)
        );
    }

    #[test]
    fn from_wire_rejects_overcount() {
        let mut octets = EXAMPLE_COM_NS_MESSAGE.to_vec();
        octets[7] = 3;
        assert_eq!(
            Message::from_wire(&octets),
            Err(Error::InvalidName(name::Error::UnexpectedEom))
        );

        let mut octets = EXAMPLE_COM_NS_MESSAGE.to_vec();
        octets[4] = 0xff;
        assert_eq!(
            Message::from_wire(&octets),
            Err(Error::CountExceedsMessage)
        );
    }

    #[test]
    fn from_wire_reads_only_counted_entries() {
        let mut octets = EXAMPLE_COM_NS_MESSAGE.to_vec();
        octets[7] = 1;
        octets[11] = 0;
        let message = Message::from_wire(&octets).unwrap();
        assert_eq!(message.answers, [ns_record("a.iana-servers.net.")]);
        assert!(message.additionals.is_empty());
    }

    #[test]
    fn from_wire_propagates_record_errors() {
        // Point the first answer's owner forward, at its own TYPE field.
        let mut octets = EXAMPLE_COM_NS_MESSAGE.to_vec();
        octets[30] = 0x1f;
        assert_eq!(
            Message::from_wire(&octets),
            Err(Error::InvalidName(name::Error::InvalidPointer))
        );
    }

    #[test]
    fn new_query_works() {
        let question = Question {
            qname: example_com(),
            qtype: Type::A,
            qclass: Class::IN,
        };
        let message = Message::new_query(question.clone(), true);
        assert!(message.header.is_query);
        assert!(message.header.rd);
        assert_eq!(message.header.opcode, Opcode::Query);
        assert_eq!(message.questions, [question]);
        let wire = message.to_wire().unwrap();
        assert_eq!(&wire[4..6], b"\x00\x01");
    }

    #[test]
    fn response_to_echoes_questions() {
        let mut request = Message::from_wire(EXAMPLE_COM_NS_MESSAGE).unwrap();
        request.header.is_query = true;
        request.header.aa = true;
        let response = Message::response_to(&request);
        assert_eq!(response.header, request.header.response());
        assert_eq!(response.questions, request.questions);
        assert!(response.records().next().is_none());
    }

    #[test]
    fn display_works() {
        let message = Message::from_wire(EXAMPLE_COM_NS_MESSAGE).unwrap();
        let text = message.to_string();
        assert!(text.starts_with(
            ";; ->>HEADER<<- opcode: QUERY, status: NOERROR, id: 58071\n\
             ;; flags: qr rd ra; QUERY: 1, ANSWER: 2, AUTHORITY: 0, ADDITIONAL: 1\n"
        ));
        assert!(text.contains("\n;; ANSWER SECTION:\nexample.com.\t86178\tIN\tNS\ta.iana-servers.net.\n"));
        assert!(!text.contains("AUTHORITY SECTION"));
    }
}
