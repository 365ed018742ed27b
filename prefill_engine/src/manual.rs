/*!

This is the long-form manual for `prefill_engine` and `formlinks`.

## Workflow

1. Create the form and, with the form service, generate one prefilled link with sample
   values. The parameter names in this link are the field identifiers.
2. Write the directory (`students.csv`, or an Excel roster) with at least the columns
   `code` and `name`.
3. Run `formlinks generate`. Every participant gets a first-round link with the code,
   the name and the first-round instructions.
4. After the first round, export the responses from the form service (Excel or CSV) and
   run `formlinks reconcile -i results.xlsx`. Every participant who answered gets a new
   link, prefilled with their writing and with some feedback on its length.
5. The redirect front end resolves the codes with `LinkIndex` (or `formlinks lookup CODE`).

## Codes

Codes are compared after trimming the whitespace and converting to uppercase:
`stu001`, ` STU001 ` and `Stu001` are the same participant.

## Directory file

A CSV file with a header. The columns `code` and `name` are mandatory. The columns
`url`, `has_response` and `word_count` are managed by the program and added when
missing. Every other column is kept unchanged.

```text
#,code,name,url,has_response,word_count
1,STU001,Alice,https://...,true,255
2,STU002,Bob,https://...,false,
```

If two rows have the same code, only the later one is kept.

## Response file

Excel (`.xlsx`) or CSV. The names of the code, name and writing columns are part of the
configuration. If the workbook has more than one worksheet, the name of the worksheet
must be given.

## Configuration

```json
{
  "form": {
    "baseUrl": "https://forms.office.com/Pages/ResponsePage.aspx?id=abc",
    "fields": {
      "studentCode": "rfaae22d4640947ab85996a667a073e61",
      "studentName": "rd51cb215ea174739855916df02ad44cf",
      "writing": "rf3225a2a947c4da49b18ae7daf8a1fa9",
      "writingInfo": "r211ff00659f648f295754189f7d59c8e"
    }
  },
  "directory": { "filePath": "students.csv" },
  "responses": {
    "codeColumn": "Student Code",
    "nameColumn": "Name1",
    "textColumn": "Newsletter Content"
  },
  "session": {
    "firstSessionInfo": "By the end of this class you should write around 250 words.",
    "wordCountTarget": 250,
    "wordCountMin": 240,
    "wordCountMax": 260
  }
}
```

The base URL must already contain the query parameter of the form (`?id=...`): the
fields are appended with `&`. Values are percent-encoded, spaces as `%20`.

Word counts count the whitespace-separated tokens. The feedback is:
- below `wordCountMin`: add about `target - count` more words;
- above `wordCountMax`: shorten by about `count - target` words;
- otherwise (both bounds included): good length.

 */
